//! Turns a stream of pointer samples into manipulation intents.
//!
//! The classifier only tracks pointers and decides what a sample means. It
//! does not touch the transform: the overlay applies the returned [`Motion`]
//! through the update functions and reports back whether anything changed.

use glam::DVec2;
use log::debug;

use crate::config::EngineConfig;
use crate::transform::{angle_delta, pinch_factor, pointer_angle, pointer_distance};

use super::{PointerEvent, TouchMode, TouchRegion};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tracked {
    id: u32,
    position: DVec2,
}

/// What a move sample asks the overlay to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Idle,
    /// Translate by `delta`. `beyond_slop` is set once the pointer has left the
    /// touch slop around its down position.
    Drag { delta: DVec2, beyond_slop: bool },
    /// Two-pointer scale and rotation relative to the previous sample.
    Pinch { factor: f64, rotate_degrees: f64 },
    /// The corner handle moved from `previous` to `current`.
    Handle { previous: DVec2, current: DVec2 },
}

/// Outcome of a pointer lifting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// Not one of the tracked pointers.
    Ignored,
    /// One of two tracked pointers lifted; the other carries on.
    Continue,
    /// The last tracked pointer lifted.
    Finished {
        click: Option<TouchRegion>,
        /// A gesture start had been announced and now needs its end.
        ended: bool,
    },
}

/// Per-overlay pointer state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureClassifier {
    region: TouchRegion,
    mode: TouchMode,
    primary: Option<Tracked>,
    secondary: Option<Tracked>,
    down_position: DVec2,
    down_timestamp: f64,
    pinch_distance: f64,
    pinch_angle: f64,
    cancel_click: bool,
    started: bool,
    handle_resumed: bool,
    ignoring: bool,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self {
            region: TouchRegion::Outside,
            mode: TouchMode::None,
            primary: None,
            secondary: None,
            down_position: DVec2::ZERO,
            down_timestamp: 0.0,
            pinch_distance: 0.0,
            pinch_angle: 0.0,
            cancel_click: false,
            started: false,
            handle_resumed: false,
            ignoring: false,
        }
    }
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self) -> TouchRegion {
        self.region
    }

    pub fn mode(&self) -> TouchMode {
        self.mode
    }

    /// True while at least one tracked pointer is down.
    pub fn is_tracking(&self) -> bool {
        self.primary.is_some()
    }

    /// True once a gesture start has been announced and not yet ended.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True after the overlay gave up the current gesture.
    pub fn is_ignoring(&self) -> bool {
        self.ignoring
    }

    /// No manipulation is running, so a multi-pointer gesture is not ours.
    ///
    /// A corner handle picked up again after a pinch counts as running.
    pub fn is_idle(&self) -> bool {
        self.mode == TouchMode::None
            && !(self.region == TouchRegion::CornerHandle && self.handle_resumed)
    }

    /// First pointer of a gesture.
    ///
    /// `acquiring_focus` marks a touch that only selects the overlay: it is
    /// reported as `Inside`, starts nothing and can never become a click.
    pub fn begin(&mut self, event: &PointerEvent, region: TouchRegion, acquiring_focus: bool) {
        *self = Self::default();
        let position = event.position();
        self.primary = Some(Tracked {
            id: event.id,
            position,
        });
        self.down_position = position;
        self.down_timestamp = event.timestamp_ms;

        if acquiring_focus && region != TouchRegion::Outside {
            self.region = TouchRegion::Inside;
            self.cancel_click = true;
            return;
        }
        self.region = region;
        if region == TouchRegion::Inside {
            self.mode = TouchMode::Dragging;
        }
    }

    /// Another pointer went down while the first is held.
    ///
    /// `inside` tells whether it landed inside the border polygon. With
    /// `locked` set the pointer is not tracked at all.
    pub fn second_down(&mut self, event: &PointerEvent, inside: bool, locked: bool) {
        if locked || self.ignoring {
            return;
        }
        let Some(primary) = self.primary else {
            return;
        };
        if self.secondary.is_some() {
            // Pointers beyond the second are ignored
            return;
        }
        let position = event.position();
        self.secondary = Some(Tracked {
            id: event.id,
            position,
        });
        self.handle_resumed = false;

        if self.region == TouchRegion::Inside && inside {
            self.pinch_distance = pointer_distance(primary.position, position);
            self.pinch_angle = pointer_angle(primary.position, position);
            self.mode = TouchMode::PointerScaleRotate;
        } else {
            self.mode = TouchMode::None;
        }
        debug!("second pointer down, mode={:?}", self.mode);
    }

    /// A pointer moved.
    pub fn moved(&mut self, event: &PointerEvent, config: &EngineConfig) -> Motion {
        if self.ignoring {
            return Motion::Idle;
        }
        let position = event.position();
        let (Some(primary), secondary) = (self.primary, self.secondary) else {
            return Motion::Idle;
        };

        let mut beyond_slop = false;
        if primary.id == event.id {
            self.primary = Some(Tracked {
                id: primary.id,
                position,
            });
            // Any primary press that wanders off its down position is no click
            let travelled = (position - self.down_position).abs();
            beyond_slop = travelled.x >= config.touch_slop || travelled.y >= config.touch_slop;
            if beyond_slop {
                self.cancel_click = true;
            }
        } else if let Some(second) = secondary.filter(|s| s.id == event.id) {
            self.secondary = Some(Tracked {
                id: second.id,
                position,
            });
        } else {
            return Motion::Idle;
        }

        match (self.mode, self.region) {
            (TouchMode::Dragging, _) if primary.id == event.id => Motion::Drag {
                delta: position - primary.position,
                beyond_slop,
            },
            (TouchMode::PointerScaleRotate, _) => {
                let (Some(a), Some(b)) = (self.primary, self.secondary) else {
                    return Motion::Idle;
                };
                let distance = pointer_distance(a.position, b.position);
                let angle = pointer_angle(a.position, b.position);
                let factor = pinch_factor(self.pinch_distance, distance);
                let rotate_degrees = angle_delta(self.pinch_angle, angle);
                self.pinch_distance = distance;
                self.pinch_angle = angle;
                Motion::Pinch {
                    factor,
                    rotate_degrees,
                }
            }
            (TouchMode::None, TouchRegion::CornerHandle) if primary.id == event.id => {
                Motion::Handle {
                    previous: primary.position,
                    current: position,
                }
            }
            _ => Motion::Idle,
        }
    }

    /// A scale or rotation took effect: the gesture is no longer a click.
    pub fn mark_manipulated(&mut self) {
        self.cancel_click = true;
    }

    /// Announce the gesture start once. Returns true the first time.
    pub fn mark_started(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        true
    }

    /// A pointer lifted. `classify` hit-tests the remaining pointer when one of
    /// two tracked pointers goes away.
    pub fn pointer_up(
        &mut self,
        event: &PointerEvent,
        click_timeout_ms: f64,
        classify: impl Fn(DVec2) -> TouchRegion,
    ) -> Release {
        let Some(primary) = self.primary else {
            return Release::Ignored;
        };

        let remaining = match self.secondary {
            Some(second) if second.id == event.id => Some(primary),
            Some(second) if primary.id == event.id => Some(second),
            _ if primary.id == event.id => None,
            _ => return Release::Ignored,
        };

        if let Some(remaining) = remaining {
            self.primary = Some(remaining);
            self.secondary = None;
            if self.ignoring {
                return Release::Continue;
            }
            self.region = match classify(remaining.position) {
                TouchRegion::CornerHandle => {
                    self.mode = TouchMode::None;
                    self.handle_resumed = true;
                    TouchRegion::CornerHandle
                }
                TouchRegion::Inside => {
                    self.mode = TouchMode::Dragging;
                    TouchRegion::Inside
                }
                _ => {
                    self.mode = TouchMode::None;
                    TouchRegion::Outside
                }
            };
            debug!("pointer up, remaining region={:?}", self.region);
            return Release::Continue;
        }

        let elapsed = event.timestamp_ms - self.down_timestamp;
        let click = if self.ignoring || self.cancel_click || elapsed > click_timeout_ms {
            None
        } else {
            match self.region {
                TouchRegion::Inside | TouchRegion::DeleteHandle => Some(self.region),
                TouchRegion::CornerHandle | TouchRegion::Outside => None,
            }
        };
        let ended = self.started;
        self.finish();
        Release::Finished { click, ended }
    }

    /// Stop reacting to the rest of this gesture. Returns true if a started
    /// gesture now needs its end announced.
    pub fn give_up(&mut self) -> bool {
        let ended = self.started;
        self.ignoring = true;
        self.started = false;
        self.mode = TouchMode::None;
        ended
    }

    /// Abort the gesture. Returns true if a started gesture needs its end.
    pub fn cancel(&mut self) -> bool {
        let ended = self.started;
        self.finish();
        ended
    }

    fn finish(&mut self) {
        let region = self.region;
        *self = Self::default();
        // Kept so hosts can still ask where the last gesture landed
        self.region = region;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a drag whose total travel stays within the slop remains a
        /// click; one that leaves it never is.
        #[test]
        fn prop_click_vs_drag(steps in prop::collection::vec((-20.0f64..20.0, -20.0f64..20.0), 1..10)) {
            let config = EngineConfig::default();
            let mut c = GestureClassifier::new();
            c.begin(&PointerEvent::down(0, 500.0, 500.0, 0.0), TouchRegion::Inside, false);
            let mut left_slop = false;
            let mut position = DVec2::new(500.0, 500.0);
            for (i, (dx, dy)) in steps.iter().enumerate() {
                position += DVec2::new(*dx, *dy);
                let travelled = (position - DVec2::new(500.0, 500.0)).abs();
                left_slop |= travelled.x >= config.touch_slop || travelled.y >= config.touch_slop;
                c.moved(&PointerEvent::moved(0, position.x, position.y, i as f64), &config);
            }
            let up = PointerEvent::up(0, position.x, position.y, 50.0);
            let release = c.pointer_up(&up, config.click_timeout_ms, |_| TouchRegion::Inside);
            let is_finished = matches!(release, Release::Finished { .. });
            prop_assert!(is_finished);
            let clicked = matches!(release, Release::Finished { click: Some(_), .. });
            prop_assert_eq!(clicked, !left_slop);
        }
    }
}
