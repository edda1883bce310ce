//! World state and core simulation types
//!
//! All state a frame needs lives in [`World`]; nothing is global, so a world
//! built from the same seed and fed the same inputs replays identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::spawn::SpawnTimer;
use crate::tuning::Tuning;

/// The player's bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: f32,
}

impl Bucket {
    /// Centered horizontally, resting at the tuned start height
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.viewport_width / 2.0 - tuning.bucket_size / 2.0,
                tuning.bucket_start_y,
            ),
            size: tuning.bucket_size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    /// Center the bucket under a pointer x coordinate. Non-finite input is ignored.
    pub fn follow(&mut self, pointer_x: f32) {
        if pointer_x.is_finite() {
            self.pos.x = pointer_x - self.size / 2.0;
        }
    }

    /// Keep the bucket fully inside the horizontal viewport bounds
    pub fn clamp_to(&mut self, tuning: &Tuning) {
        self.pos.x = self.pos.x.clamp(0.0, tuning.bucket_max_x());
    }
}

/// A falling raindrop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Raindrop {
    pub id: u32,
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: f32,
}

impl Raindrop {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    /// Entirely below the bottom edge of the viewport
    #[inline]
    pub fn is_below_viewport(&self) -> bool {
        self.pos.y + self.size < 0.0
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub bucket: Bucket,
    /// Active raindrops (order carries no meaning)
    pub raindrops: Vec<Raindrop>,
    /// Simulated monotonic clock
    pub clock_ns: u64,
    pub spawn_timer: SpawnTimer,
    /// Raindrops caught by the bucket
    pub drops_gathered: u32,
    /// Raindrops that fell past the bottom edge
    pub drops_missed: u32,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create a world with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a world and drop the first raindrop straight away
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut world = Self {
            seed,
            tuning,
            bucket: Bucket::new(&tuning),
            raindrops: Vec::new(),
            clock_ns: 0,
            spawn_timer: SpawnTimer::new(tuning.spawn_interval_ns),
            drops_gathered: 0,
            drops_missed: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        world.spawn_raindrop();
        log::debug!("World created with seed {}", seed);
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a raindrop at a random x along the top edge and restart the timer
    pub fn spawn_raindrop(&mut self) -> Raindrop {
        let id = self.next_entity_id();
        let x = self.rng.random_range(0.0..=self.tuning.raindrop_max_x());
        let drop = Raindrop {
            id,
            pos: Vec2::new(x, self.tuning.viewport_height),
            size: self.tuning.raindrop_size,
        };
        self.raindrops.push(drop);
        self.spawn_timer.mark(self.clock_ns);
        log::trace!("Spawned raindrop {} at x={:.1}", id, x);
        drop
    }

    /// Simulated seconds since the world was created
    pub fn elapsed_secs(&self) -> f64 {
        crate::nanos_to_secs(self.clock_ns)
    }
}
