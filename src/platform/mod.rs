//! Platform abstraction layer
//!
//! Handles the bits of browser/native differences the game needs:
//! - Mapping pointer pixels on the canvas into world coordinates
//! - Turning host timestamps into frame deltas

use glam::Vec2;

use crate::consts::MAX_FRAME_DT;
use crate::tuning::Tuning;

/// Convert a canvas-relative pointer position (pixels, origin top-left, y down)
/// into world coordinates (origin bottom-left, y up). The whole viewport is
/// stretched over the canvas.
pub fn unproject(px: f32, py: f32, canvas_w: f32, canvas_h: f32, tuning: &Tuning) -> Option<Vec2> {
    if !(canvas_w > 0.0 && canvas_h > 0.0) {
        return None;
    }
    let x = px / canvas_w * tuning.viewport_width;
    let y = (1.0 - py / canvas_h) * tuning.viewport_height;
    Some(Vec2::new(x, y))
}

/// Frame delta tracking from host timestamps in milliseconds
/// (`requestAnimationFrame` time on the web, `Instant` on native).
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, clamped to `[0, MAX_FRAME_DT]`.
    /// The first call returns 0.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        }
    }

    /// Forget the last timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
