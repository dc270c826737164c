//! Single-focus arbitration between overlays.
//!
//! The coordinator is the only writer of each overlay's focus flag. Overlays
//! are addressed by [`OverlayId`], so removing one only needs its id cleared
//! here; there are no back-references to invalidate.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::OverlayId;

/// Something the coordinator can focus.
pub(crate) trait Focusable {
    fn overlay_id(&self) -> OverlayId;
    fn set_focus_flag(&mut self, focused: bool);
}

/// One focus transition, raised once per change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusChange {
    pub previous: Option<OverlayId>,
    pub current: Option<OverlayId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusCoordinator {
    focused: Option<OverlayId>,
    last_focused: Option<OverlayId>,
}

impl FocusCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused overlay, if any.
    pub fn focused(&self) -> Option<OverlayId> {
        self.focused
    }

    /// Focus `id`, unfocusing whatever held focus before.
    pub(crate) fn request_focus<T: Focusable>(
        &mut self,
        overlays: &mut [T],
        id: OverlayId,
    ) -> Option<FocusChange> {
        if self.focused == Some(id) || !overlays.iter().any(|o| o.overlay_id() == id) {
            return None;
        }
        self.change_to(overlays, Some(id))
    }

    /// Drop focus from `id` if it holds it.
    pub(crate) fn release_focus<T: Focusable>(
        &mut self,
        overlays: &mut [T],
        id: OverlayId,
    ) -> Option<FocusChange> {
        if self.focused != Some(id) {
            return None;
        }
        self.change_to(overlays, None)
    }

    /// Drop focus from whichever overlay holds it.
    pub(crate) fn clear_focus<T: Focusable>(&mut self, overlays: &mut [T]) -> Option<FocusChange> {
        self.focused?;
        self.change_to(overlays, None)
    }

    /// Forget `id` after it left the container. Raises no notification.
    pub(crate) fn on_overlay_removed(&mut self, id: OverlayId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.last_focused == Some(id) {
            self.last_focused = None;
        }
    }

    fn change_to<T: Focusable>(
        &mut self,
        overlays: &mut [T],
        next: Option<OverlayId>,
    ) -> Option<FocusChange> {
        self.last_focused = self.focused;
        self.focused = next;
        for overlay in overlays.iter_mut() {
            let id = overlay.overlay_id();
            if Some(id) == self.last_focused || Some(id) == next {
                overlay.set_focus_flag(Some(id) == next);
            }
        }
        let change = FocusChange {
            previous: self.last_focused.take(),
            current: next,
        };
        debug!("focus {:?} -> {:?}", change.previous, change.current);
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::tests_support::{overlays as fakes, Fake};
    use super::*;

    fn focused_ids(overlays: &[Fake]) -> Vec<OverlayId> {
        overlays.iter().filter(|o| o.focused).map(|o| o.id).collect()
    }

    #[test]
    fn test_request_moves_focus() {
        let mut overlays = fakes(3);
        let mut c = FocusCoordinator::new();

        let change = c.request_focus(&mut overlays, OverlayId(1));
        assert_eq!(
            change,
            Some(FocusChange {
                previous: None,
                current: Some(OverlayId(1))
            })
        );

        let change = c.request_focus(&mut overlays, OverlayId(2));
        assert_eq!(
            change,
            Some(FocusChange {
                previous: Some(OverlayId(1)),
                current: Some(OverlayId(2))
            })
        );
        assert_eq!(focused_ids(&overlays), vec![OverlayId(2)]);
        assert_eq!(c.focused(), Some(OverlayId(2)));
    }

    #[test]
    fn test_request_same_is_silent() {
        let mut overlays = fakes(2);
        let mut c = FocusCoordinator::new();
        c.request_focus(&mut overlays, OverlayId(0));
        assert_eq!(c.request_focus(&mut overlays, OverlayId(0)), None);
    }

    #[test]
    fn test_request_unknown_is_ignored() {
        let mut overlays = fakes(2);
        let mut c = FocusCoordinator::new();
        assert_eq!(c.request_focus(&mut overlays, OverlayId(9)), None);
        assert_eq!(c.focused(), None);
    }

    #[test]
    fn test_release_only_by_holder() {
        let mut overlays = fakes(2);
        let mut c = FocusCoordinator::new();
        c.request_focus(&mut overlays, OverlayId(0));
        assert_eq!(c.release_focus(&mut overlays, OverlayId(1)), None);
        assert_eq!(
            c.release_focus(&mut overlays, OverlayId(0)),
            Some(FocusChange {
                previous: Some(OverlayId(0)),
                current: None
            })
        );
        assert!(focused_ids(&overlays).is_empty());
    }

    #[test]
    fn test_clear_focus() {
        let mut overlays = fakes(2);
        let mut c = FocusCoordinator::new();
        assert_eq!(c.clear_focus(&mut overlays), None);
        c.request_focus(&mut overlays, OverlayId(1));
        assert!(c.clear_focus(&mut overlays).is_some());
        assert_eq!(c.focused(), None);
        assert!(focused_ids(&overlays).is_empty());
    }

    #[test]
    fn test_removed_overlay_is_forgotten() {
        let mut overlays = fakes(2);
        let mut c = FocusCoordinator::new();
        c.request_focus(&mut overlays, OverlayId(1));
        overlays.pop();
        c.on_overlay_removed(OverlayId(1));
        assert_eq!(c.focused(), None);
        // The next focus change reports no stale previous
        assert_eq!(
            c.request_focus(&mut overlays, OverlayId(0)),
            Some(FocusChange {
                previous: None,
                current: Some(OverlayId(0))
            })
        );
    }
}
