//! Best runs leaderboard
//!
//! Persisted to LocalStorage in the browser and to a JSON file natively.
//! Keeps the top 10 runs by drops collected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::screen::RunSummary;

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Drops collected during the run
    pub drops: u32,
    /// Length of the run in simulated seconds
    pub elapsed_secs: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Failure reading or writing a native score file
#[derive(Debug, Error)]
pub enum ScoreFileError {
    #[error("score file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("score file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// High score leaderboard, sorted by drops descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "rain_catcher_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, drops: u32) -> bool {
        if drops == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| drops > e.drops).unwrap_or(true)
    }

    /// Add a run to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, drops: u32, elapsed_secs: f64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(drops) {
            return None;
        }

        let entry = HighScoreEntry {
            drops,
            elapsed_secs,
            timestamp,
        };

        // Ties keep the older run ahead
        let pos = self.entries.iter().position(|e| drops > e.drops);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Record a finished run
    pub fn record(&mut self, run: &RunSummary, timestamp: f64) -> Option<usize> {
        self.add_score(run.drops_gathered, run.elapsed_secs, timestamp)
    }

    /// Best drop count (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.drops)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded {} high scores", scores.entries.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding corrupt high scores: {}", e),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Load high scores from a JSON file. A missing file is an empty table.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, ScoreFileError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No score file at {}, starting fresh", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded {} high scores from {}", scores.entries.len(), path.display());
        Ok(scores)
    }

    /// Write high scores to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ScoreFileError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("High scores saved to {} ({} entries)", path.display(), self.entries.len());
        Ok(())
    }
}

/// Format a run length as `m:ss`
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_sorted_insert_and_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(5, 30.0, 1.0), Some(1));
        assert_eq!(scores.add_score(10, 40.0, 2.0), Some(1));
        assert_eq!(scores.add_score(7, 35.0, 3.0), Some(2));
        assert_eq!(scores.add_score(5, 20.0, 4.0), Some(4));

        let drops: Vec<u32> = scores.entries.iter().map(|e| e.drops).collect();
        assert_eq!(drops, vec![10, 7, 5, 5]);
        assert_eq!(scores.top_score(), Some(10));
    }

    #[test]
    fn test_table_is_capped() {
        let mut scores = HighScores::new();
        for drops in 1..=15 {
            scores.add_score(drops, 0.0, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.drops), Some(6));
        assert!(!scores.qualifies(6));
        assert!(scores.qualifies(7));
    }

    #[test]
    fn test_record_run() {
        let mut scores = HighScores::new();
        let run = RunSummary {
            seed: 1,
            drops_gathered: 12,
            drops_missed: 3,
            elapsed_secs: 61.5,
        };
        assert_eq!(scores.record(&run, 100.0), Some(1));
        assert_eq!(scores.entries[0].elapsed_secs, 61.5);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_score_file_keeps_earlier_runs() {
        let path = std::env::temp_dir().join(format!(
            "rain_catcher_scores_{}_{}.json",
            std::process::id(),
            line!()
        ));
        let _ = std::fs::remove_file(&path);

        let run = RunSummary {
            seed: 4,
            drops_gathered: 9,
            drops_missed: 1,
            elapsed_secs: 30.0,
        };

        let mut scores = HighScores::load_from(&path).unwrap();
        assert_eq!(scores.record(&run, 1.0), Some(1));
        scores.save_to(&path).unwrap();

        let mut reloaded = HighScores::load_from(&path).unwrap();
        assert_eq!(reloaded.entries, scores.entries);
        assert_eq!(reloaded.record(&run, 2.0), Some(2));

        std::fs::remove_file(&path).unwrap();
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_corrupt_score_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "rain_catcher_scores_{}_{}.json",
            std::process::id(),
            line!()
        ));
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            HighScores::load_from(&path),
            Err(ScoreFileError::Parse(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(61.9), "1:01");
        assert_eq!(format_duration(-3.0), "0:00");
    }
}
