//! Engine settings.
//!
//! Every threshold the gesture engine uses lives here so a host can tune the
//! feel per device. Missing fields deserialize to the defaults, so a host may
//! pass a partial object (`{ "touch_slop": 12 }`).

use serde::{Deserialize, Serialize};

use crate::error::{CaptionError, ConfigError};

/// Tunable thresholds for gestures, clamping and snapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Angular distance from an axis (0/90/180/270) inside which rotation sticks, in degrees.
    pub snap_threshold_degrees: f64,
    /// Apply axis snapping during two-pointer rotation as well as corner-handle rotation.
    pub snap_pinch_rotation: bool,
    /// Largest transformed width/height relative to the container width/height.
    pub max_border_scale: f64,
    /// Smallest transformed width/height in pixels. Must be at least twice the
    /// icon size so both handles stay reachable.
    pub min_border_size: f64,
    /// Edge length of the square handle hit areas, in pixels.
    pub icon_size: f64,
    /// Movement in pixels after which a touch is a drag rather than a click.
    pub touch_slop: f64,
    /// Longest press that still counts as a click, in milliseconds.
    pub click_timeout_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_threshold_degrees: 10.0,
            snap_pinch_rotation: false,
            max_border_scale: 1.5,
            min_border_size: 60.0,
            icon_size: 30.0,
            touch_slop: 8.0,
            click_timeout_ms: 100.0,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, CaptionError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        Ok(config.validate()?)
    }

    /// Check every field, returning the configuration unchanged on success.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let positive = [
            ("snap_threshold_degrees", self.snap_threshold_degrees),
            ("max_border_scale", self.max_border_scale),
            ("min_border_size", self.min_border_size),
            ("icon_size", self.icon_size),
            ("touch_slop", self.touch_slop),
            ("click_timeout_ms", self.click_timeout_ms),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.snap_threshold_degrees >= 45.0 {
            return Err(ConfigError::SnapThresholdTooLarge(self.snap_threshold_degrees));
        }
        if self.max_border_scale < 1.0 {
            return Err(ConfigError::MaxBorderScaleTooSmall(self.max_border_scale));
        }
        // Both handle squares must fit along the shortest edge
        if self.min_border_size < 2.0 * self.icon_size {
            return Err(ConfigError::MinBorderSizeTooSmall {
                min_border_size: self.min_border_size,
                icon_size: self.icon_size,
            });
        }
        Ok(self)
    }
}
