//! Data-driven game balance
//!
//! Every number the simulation depends on lives here so a run can be replayed
//! or rebalanced from a JSON file without touching code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("viewport {width}x{height} cannot hold a {object}x{object} sprite")]
    ViewportTooSmall { width: f32, height: f32, object: f32 },

    #[error("spawn interval must be non-zero")]
    ZeroSpawnInterval,
}

/// Balance values for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub bucket_size: f32,
    pub bucket_start_y: f32,
    pub raindrop_size: f32,
    /// Units per second
    pub fall_speed: f32,
    pub spawn_interval_ns: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            bucket_size: BUCKET_SIZE,
            bucket_start_y: BUCKET_START_Y,
            raindrop_size: RAINDROP_SIZE,
            fall_speed: FALL_SPEED,
            spawn_interval_ns: SPAWN_INTERVAL_NS,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("bucket_size", self.bucket_size),
            ("raindrop_size", self.raindrop_size),
            ("fall_speed", self.fall_speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        if !self.bucket_start_y.is_finite() {
            return Err(TuningError::NotPositive {
                field: "bucket_start_y",
                value: self.bucket_start_y,
            });
        }

        let largest = self.bucket_size.max(self.raindrop_size);
        if self.viewport_width < largest || self.viewport_height < largest {
            return Err(TuningError::ViewportTooSmall {
                width: self.viewport_width,
                height: self.viewport_height,
                object: largest,
            });
        }

        if self.spawn_interval_ns == 0 {
            return Err(TuningError::ZeroSpawnInterval);
        }
        Ok(())
    }

    /// Rightmost x the bucket may occupy
    #[inline]
    pub fn bucket_max_x(&self) -> f32 {
        (self.viewport_width - self.bucket_size).max(0.0)
    }

    /// Rightmost x a raindrop may spawn at
    #[inline]
    pub fn raindrop_max_x(&self) -> f32 {
        (self.viewport_width - self.raindrop_size).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.bucket_max_x(), 736.0);
        assert_eq!(tuning.raindrop_max_x(), 736.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "fall_speed": 350.0 }"#).unwrap();
        assert_eq!(tuning.fall_speed, 350.0);
        assert_eq!(tuning.viewport_width, VIEWPORT_WIDTH);
        assert_eq!(tuning.spawn_interval_ns, SPAWN_INTERVAL_NS);
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning {
            fall_speed: 120.0,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "fall_speed": -1.0 }"#),
            Err(TuningError::NotPositive { field: "fall_speed", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "viewport_width": 32.0 }"#),
            Err(TuningError::ViewportTooSmall { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "spawn_interval_ns": 0 }"#),
            Err(TuningError::ZeroSpawnInterval)
        ));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
