//! Pointer input types and the per-overlay gesture classifier.

mod classifier;

pub use classifier::{GestureClassifier, Motion, Release};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Phase of a single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One pointer sample in container pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub phase: PointerPhase,
    /// Milliseconds on any monotonic clock; only differences are used.
    #[serde(default)]
    pub timestamp_ms: f64,
}

impl PointerEvent {
    pub fn new(id: u32, x: f64, y: f64, phase: PointerPhase, timestamp_ms: f64) -> Self {
        Self {
            id,
            x,
            y,
            phase,
            timestamp_ms,
        }
    }

    pub fn down(id: u32, x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self::new(id, x, y, PointerPhase::Down, timestamp_ms)
    }

    pub fn moved(id: u32, x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self::new(id, x, y, PointerPhase::Move, timestamp_ms)
    }

    pub fn up(id: u32, x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self::new(id, x, y, PointerPhase::Up, timestamp_ms)
    }

    pub fn cancel(id: u32, timestamp_ms: f64) -> Self {
        Self::new(id, 0.0, 0.0, PointerPhase::Cancel, timestamp_ms)
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// Where a pointer first touched an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchRegion {
    /// Inside the rotated border polygon.
    Inside,
    /// Bottom-right scale/rotate handle.
    CornerHandle,
    /// Top-left delete handle.
    DeleteHandle,
    Outside,
}

/// Active manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchMode {
    #[default]
    None,
    Dragging,
    PointerScaleRotate,
}
