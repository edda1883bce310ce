//! Raindrop spawn timer
//!
//! Timestamps are nanoseconds on the world's simulated monotonic clock.

use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_INTERVAL_NS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimer {
    /// Clock reading of the most recent spawn
    pub last_spawn_ns: u64,
    pub interval_ns: u64,
}

impl Default for SpawnTimer {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL_NS)
    }
}

impl SpawnTimer {
    pub fn new(interval_ns: u64) -> Self {
        Self {
            last_spawn_ns: 0,
            interval_ns,
        }
    }

    /// Strictly more than one interval has passed since the last spawn
    #[inline]
    pub fn is_due(&self, now_ns: u64) -> bool {
        now_ns.saturating_sub(self.last_spawn_ns) > self.interval_ns
    }

    #[inline]
    pub fn mark(&mut self, now_ns: u64) {
        self.last_spawn_ns = now_ns;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_only_after_full_interval() {
        let mut timer = SpawnTimer::new(1_000);
        timer.mark(500);
        assert!(!timer.is_due(500));
        assert!(!timer.is_due(1_500));
        assert!(timer.is_due(1_501));
    }

    #[test]
    fn test_clock_behind_mark_is_not_due() {
        let mut timer = SpawnTimer::new(1_000);
        timer.mark(10_000);
        assert!(!timer.is_due(0));
    }
}
