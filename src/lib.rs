//! Rain Catcher - catch the falling raindrops with a bucket
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bucket, raindrops, spawning, overlaps)
//! - `screen`: Main menu / game / pause shell around the simulation
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Pointer unprojection and frame clock
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod screen;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use screen::{RunSummary, Screen, Shell};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Viewport (camera) size in world units, origin at the bottom-left
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 480.0;

    /// Bucket sprite is 64x64
    pub const BUCKET_SIZE: f32 = 64.0;
    /// Bucket rests this far above the bottom edge
    pub const BUCKET_START_Y: f32 = 20.0;

    /// Raindrop sprite is 64x64
    pub const RAINDROP_SIZE: f32 = 64.0;
    /// Fall speed in units per second
    pub const FALL_SPEED: f32 = 200.0;

    /// Nanoseconds between raindrop spawns
    pub const SPAWN_INTERVAL_NS: u64 = 1_000_000_000;

    /// Largest frame delta the host feeds the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Seconds to whole nanoseconds, saturating at zero for bad input
#[inline]
pub fn secs_to_nanos(secs: f32) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        (secs as f64 * 1_000_000_000.0) as u64
    } else {
        0
    }
}

/// Nanoseconds to seconds
#[inline]
pub fn nanos_to_secs(nanos: u64) -> f64 {
    nanos as f64 / 1_000_000_000.0
}
