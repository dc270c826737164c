//! Error types for the caption engine.
//!
//! Gesture handling never fails: bad input is clamped and the worst outcome is
//! a no-op gesture. These errors cover the host-facing operations that can
//! genuinely be rejected.

use thiserror::Error;

use crate::OverlayId;

/// Error types for caption operations outside the gesture loop.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// Engine settings failed validation.
    #[error("Invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    /// The overlay was removed or never existed in this container.
    #[error("Unknown overlay: {0}")]
    UnknownOverlay(OverlayId),

    /// A persisted record or settings object was not valid JSON for its type.
    #[error("Invalid JSON: {0}")]
    Json(String),

    /// Image bytes did not carry a readable header.
    #[error("Unreadable image: {0}")]
    UnreadableImage(String),
}

impl From<serde_json::Error> for CaptionError {
    fn from(err: serde_json::Error) -> Self {
        CaptionError::Json(err.to_string())
    }
}

impl From<image::ImageError> for CaptionError {
    fn from(err: image::ImageError) -> Self {
        CaptionError::UnreadableImage(err.to_string())
    }
}

/// A single engine setting outside its valid range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("snap_threshold_degrees must be below 45, got {0}")]
    SnapThresholdTooLarge(f64),

    #[error("max_border_scale must be at least 1.0, got {0}")]
    MaxBorderScaleTooSmall(f64),

    #[error("min_border_size {min_border_size} leaves no room for two {icon_size}px handles")]
    MinBorderSizeTooSmall { min_border_size: f64, icon_size: f64 },
}
