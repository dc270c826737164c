//! Magnetic snapping of rotation to the 0/90/180/270 degree axes.
//!
//! The finger's raw rotation is accumulated separately from the rotation that
//! is actually applied to the overlay:
//!
//! - While the applied rotation sits on an axis, finger movement is absorbed
//!   until the finger is more than the threshold away from that axis. The
//!   overlay then jumps straight to the finger.
//! - While off-axis, the overlay follows the finger, but as soon as the next
//!   step would land within the threshold of an axis it snaps onto the axis.

use crate::geometry::{normalize_degrees, wrap_degrees};

/// Tolerance for treating an applied rotation as lying on an axis.
const AXIS_EPSILON: f64 = 1e-9;

/// Signed distance from `degree` to the nearest axis, and that axis.
fn nearest_axis(degree: f64) -> (f64, f64) {
    let degree = normalize_degrees(degree);
    let axis = (degree / 90.0).round() * 90.0;
    (wrap_degrees(degree - axis), normalize_degrees(axis))
}

/// True if `degree` lies on a multiple of 90.
pub fn is_on_axis(degree: f64) -> bool {
    nearest_axis(degree).0.abs() <= AXIS_EPSILON
}

/// Finger-rotation accumulator for one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationSnap {
    finger_degree: f64,
}

impl RotationSnap {
    pub fn new(applied_degree: f64) -> Self {
        Self {
            finger_degree: normalize_degrees(applied_degree),
        }
    }

    /// Raw accumulated finger rotation, normalized into `[0, 360)`.
    pub fn finger_degree(&self) -> f64 {
        self.finger_degree
    }

    /// Re-align the finger with the applied rotation, e.g. at gesture start or
    /// after an unsnapped rotation.
    pub fn sync(&mut self, applied_degree: f64) {
        self.finger_degree = normalize_degrees(applied_degree);
    }

    /// Feed a raw finger rotation and return the rotation to actually apply.
    ///
    /// `applied_degree` is the overlay's current total rotation.
    pub fn adjust(&mut self, applied_degree: f64, delta: f64, threshold: f64) -> f64 {
        self.finger_degree = normalize_degrees(self.finger_degree + delta);

        let (offset, axis) = nearest_axis(applied_degree);
        if offset.abs() <= AXIS_EPSILON {
            // Pinned on an axis: stay until the finger breaks away
            let away = wrap_degrees(self.finger_degree - axis);
            if away.abs() <= threshold {
                return 0.0;
            }
            return wrap_degrees(self.finger_degree - applied_degree);
        }

        // Off-axis: snap onto an axis once the step lands close enough
        let (after_offset, _) = nearest_axis(applied_degree + delta);
        if after_offset.abs() <= threshold {
            return delta - after_offset;
        }
        delta
    }
}

/// Release-time alternative: round `degree` to the nearest axis when within
/// `threshold`, otherwise return it unchanged.
pub fn snap_to_axis(degree: f64, threshold: f64) -> f64 {
    let (offset, axis) = nearest_axis(degree);
    if offset.abs() <= threshold {
        axis
    } else {
        normalize_degrees(degree)
    }
}
