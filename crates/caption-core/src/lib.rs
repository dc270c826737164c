//! Caption Core - caption overlay transform and gesture engine
//!
//! This crate moves, scales and rotates rectangular captions laid over an
//! image in response to pointer input, arbitrates focus between captions, and
//! exports caption geometry in a form that survives being redrawn at another
//! resolution. Text layout and drawing stay with the host.

pub mod codec;
pub mod config;
pub mod container;
pub mod content;
pub mod error;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod gesture;
pub mod overlay;
pub mod transform;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use codec::{GeometryRecord, RecordSize};
pub use config::EngineConfig;
pub use container::Container;
pub use content::{
    image_size_from_bytes, CaptionContent, ContentSizer, ImageCaption, Padding, TextAlignment,
    TextCaption, TextStyle,
};
pub use error::{CaptionError, ConfigError};
pub use event::CaptionEvent;
pub use focus::{FocusChange, FocusCoordinator};
pub use geometry::{Quad, Rect, Size};
pub use gesture::{PointerEvent, PointerPhase, TouchMode, TouchRegion};
pub use overlay::Overlay;
pub use transform::{TransformDelta, TransformState};

/// Identifies an overlay within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(pub u32);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_id_display() {
        assert_eq!(OverlayId(3).to_string(), "#3");
    }

    #[test]
    fn test_overlay_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&OverlayId(12)).unwrap(), "12");
    }
}
