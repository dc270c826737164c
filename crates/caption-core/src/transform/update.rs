//! Pure transform updates driven by gesture samples.
//!
//! Each function takes the current state plus a raw delta and returns the next
//! state, or `None` when the clamped delta would not change anything. Callers
//! use `None` to skip the redraw.

use glam::DVec2;

use crate::config::EngineConfig;
use crate::geometry::{angle_degrees, wrap_degrees, Size};

use super::state::{TransformDelta, TransformState};

/// Size limits for one container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub container: Size,
    pub max_border_scale: f64,
    pub min_border_size: f64,
}

impl Limits {
    pub fn new(container: Size, config: &EngineConfig) -> Self {
        Self {
            container: container.sanitized(),
            max_border_scale: config.max_border_scale,
            min_border_size: config.min_border_size,
        }
    }

    /// Largest allowed transformed width and height.
    pub fn max_size(&self) -> Size {
        Size::new(
            self.container.width * self.max_border_scale,
            self.container.height * self.max_border_scale,
        )
    }
}

/// Clamp a drag so the center stays inside the container.
pub fn clamp_move_delta(state: &TransformState, delta: DVec2, container: Size) -> DVec2 {
    if !delta.is_finite() {
        return DVec2::ZERO;
    }
    let center = state.center();
    let target = (center + delta).clamp(DVec2::ZERO, container.as_vec());
    target - center
}

/// Clamp a scale factor so the transformed edges stay between the minimum
/// border size and the maximum border scale.
///
/// A factor that would cross a bound is recomputed to land exactly on it. A
/// factor that is zero, negative or not finite becomes 1.
pub fn clamp_scale_factor(state: &TransformState, factor: f64, limits: &Limits) -> f64 {
    if !factor.is_finite() || factor <= 0.0 {
        return 1.0;
    }
    let size = state.scaled_size();
    if factor > 1.0 {
        let max = limits.max_size();
        let upper = (max.width / size.width).min(max.height / size.height);
        // Already past the bound: hold rather than shrink
        factor.min(upper).max(1.0)
    } else if factor < 1.0 {
        let lower =
            (limits.min_border_size / size.width).max(limits.min_border_size / size.height);
        factor.max(lower).min(1.0)
    } else {
        1.0
    }
}

/// Apply a clamped drag.
pub fn apply_move(state: &TransformState, delta: DVec2, container: Size) -> Option<TransformState> {
    let delta = clamp_move_delta(state, delta, container);
    if delta == DVec2::ZERO {
        return None;
    }
    Some(state.composed(TransformDelta::translation(delta)))
}

/// Apply a joint scale and rotation about the center, clamping the scale.
pub fn apply_scale_rotate(
    state: &TransformState,
    factor: f64,
    rotate_degrees: f64,
    limits: &Limits,
) -> Option<TransformState> {
    let scale = clamp_scale_factor(state, factor, limits);
    let rotate_degrees = if rotate_degrees.is_finite() {
        rotate_degrees
    } else {
        0.0
    };
    let delta = TransformDelta {
        translate: DVec2::ZERO,
        scale,
        rotate_degrees,
    };
    if delta.is_identity() {
        return None;
    }
    Some(state.composed(delta))
}

/// Distance between two pointers.
pub fn pointer_distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Angle of the vector from `a` to `b`, in degrees.
pub fn pointer_angle(a: DVec2, b: DVec2) -> f64 {
    angle_degrees(b - a)
}

/// Ratio of two pointer distances. A degenerate previous distance gives 1.
pub fn pinch_factor(previous_distance: f64, distance: f64) -> f64 {
    if !previous_distance.is_finite() || previous_distance <= 0.0 || !distance.is_finite() {
        return 1.0;
    }
    distance / previous_distance
}

/// Rotation between two angle samples, wrapped into `(-180, 180]`.
pub fn angle_delta(previous: f64, current: f64) -> f64 {
    wrap_degrees(current - previous)
}

/// Scale factor and rotation implied by moving a corner handle from `previous`
/// to `current` around `center`.
///
/// The scale is the ratio of the pointer-to-center radii and the rotation is
/// the change in their angle. A pointer sitting exactly on the center yields
/// no change.
pub fn handle_scale_rotate(center: DVec2, previous: DVec2, current: DVec2) -> (f64, f64) {
    let from = previous - center;
    let to = current - center;
    let (from_len, to_len) = (from.length(), to.length());
    if from_len <= 0.0 || to_len <= 0.0 {
        return (1.0, 0.0);
    }
    let rotate = angle_delta(angle_degrees(from), angle_degrees(to));
    (to_len / from_len, rotate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn container() -> Size {
        Size::new(1000.0, 1000.0)
    }

    fn limits() -> Limits {
        Limits::new(container(), &EngineConfig::default())
    }

    fn state() -> TransformState {
        TransformState::new(Rect::from_center_size(
            DVec2::new(500.0, 500.0),
            Size::new(200.0, 100.0),
        ))
    }

    #[test]
    fn test_move_applies_delta() {
        let next = apply_move(&state(), DVec2::new(50.0, -30.0), container()).unwrap();
        assert!((next.center() - DVec2::new(550.0, 470.0)).length() < 1e-9);
    }

    #[test]
    fn test_move_clamps_center_to_container() {
        let next = apply_move(&state(), DVec2::new(900.0, -900.0), container()).unwrap();
        assert!((next.center() - DVec2::new(1000.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_move_at_edge_is_noop() {
        let at_edge = apply_move(&state(), DVec2::new(600.0, 0.0), container()).unwrap();
        assert!(apply_move(&at_edge, DVec2::new(10.0, 0.0), container()).is_none());
    }

    #[test]
    fn test_move_ignores_nan() {
        assert!(apply_move(&state(), DVec2::new(f64::NAN, 1.0), container()).is_none());
    }

    #[test]
    fn test_scale_up_clamped_to_max_border_scale() {
        let factor = clamp_scale_factor(&state(), 10.0, &limits());
        // 200 wide may grow to 1500: 7.5x
        assert!((factor - 7.5).abs() < 1e-12);
        let next = apply_scale_rotate(&state(), 10.0, 0.0, &limits()).unwrap();
        assert!((next.scaled_size().width - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_down_clamped_to_min_border_size() {
        let factor = clamp_scale_factor(&state(), 0.01, &limits());
        // 100 high may shrink to 60
        assert!((factor - 0.6).abs() < 1e-12);
        let next = apply_scale_rotate(&state(), 0.01, 0.0, &limits()).unwrap();
        assert!((next.scaled_size().height - 60.0).abs() < 1e-9);
        assert!((next.scaled_size().width - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_degenerate_factor_is_one() {
        assert_eq!(clamp_scale_factor(&state(), 0.0, &limits()), 1.0);
        assert_eq!(clamp_scale_factor(&state(), -2.0, &limits()), 1.0);
        assert_eq!(clamp_scale_factor(&state(), f64::INFINITY, &limits()), 1.0);
        assert_eq!(clamp_scale_factor(&state(), f64::NAN, &limits()), 1.0);
        assert!(apply_scale_rotate(&state(), f64::NAN, 0.0, &limits()).is_none());
    }

    #[test]
    fn test_scale_at_bound_holds() {
        let at_max = apply_scale_rotate(&state(), 10.0, 0.0, &limits()).unwrap();
        assert_eq!(clamp_scale_factor(&at_max, 1.5, &limits()), 1.0);
        // Shrinking is still allowed
        assert!((clamp_scale_factor(&at_max, 0.5, &limits()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pinch_factor() {
        assert_eq!(pinch_factor(100.0, 120.0), 1.2);
        assert_eq!(pinch_factor(0.0, 120.0), 1.0);
        assert_eq!(pinch_factor(f64::NAN, 120.0), 1.0);
    }

    #[test]
    fn test_pointer_angle_and_delta() {
        let a = DVec2::new(0.0, 0.0);
        assert!((pointer_angle(a, DVec2::new(0.0, 10.0)) - 90.0).abs() < 1e-12);
        assert_eq!(angle_delta(170.0, -170.0), 20.0);
        assert_eq!(angle_delta(-170.0, 170.0), -20.0);
        assert_eq!(pointer_distance(a, DVec2::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_handle_scale_rotate() {
        let center = DVec2::new(500.0, 500.0);
        let (scale, rotate) =
            handle_scale_rotate(center, DVec2::new(600.0, 500.0), DVec2::new(500.0, 700.0));
        assert!((scale - 2.0).abs() < 1e-12);
        assert!((rotate - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_handle_on_center_is_noop() {
        let center = DVec2::new(500.0, 500.0);
        assert_eq!(
            handle_scale_rotate(center, center, DVec2::new(600.0, 600.0)),
            (1.0, 0.0)
        );
    }
}
