//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the frame delta handed to `advance`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod step;

pub use autopilot::autopilot_target;
pub use rect::Rect;
pub use spawn::SpawnTimer;
pub use state::{Bucket, Raindrop, World};
pub use step::{FrameEvent, FrameInput, Sound, advance, count_sounds};
