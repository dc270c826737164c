//! Notifications raised while handling pointer input.

use serde::{Deserialize, Serialize};

use crate::focus::FocusChange;
use crate::OverlayId;

/// Something the host should react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CaptionEvent {
    InsideClick { overlay: OverlayId },
    DeleteHandleClick { overlay: OverlayId },
    GestureStart { overlay: OverlayId },
    GestureEnd { overlay: OverlayId },
    /// The overlay's corners, handles or style changed.
    Redraw { overlay: OverlayId },
    FocusChanged {
        previous: Option<OverlayId>,
        current: Option<OverlayId>,
    },
}

impl From<FocusChange> for CaptionEvent {
    fn from(change: FocusChange) -> Self {
        CaptionEvent::FocusChanged {
            previous: change.previous,
            current: change.current,
        }
    }
}
