//! Per-overlay transform state.
//!
//! The state is a base rectangle plus an affine matrix built only from
//! translations, uniform scales and rotations. Everything else (corners,
//! center) is derived from those two, so the center can never drift away from
//! the geometry it describes.

use glam::{DAffine2, DVec2};

use crate::geometry::{normalize_degrees, Quad, Rect, Size};

/// One incremental change to a transform.
///
/// Components are applied in order: translate, then scale, then rotate. Scale
/// and rotation pivot on the center as it stands after the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformDelta {
    pub translate: DVec2,
    pub scale: f64,
    pub rotate_degrees: f64,
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self {
            translate: DVec2::ZERO,
            scale: 1.0,
            rotate_degrees: 0.0,
        }
    }
}

impl TransformDelta {
    pub fn translation(translate: DVec2) -> Self {
        Self {
            translate,
            ..Self::default()
        }
    }

    pub fn scaling(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    pub fn rotation(rotate_degrees: f64) -> Self {
        Self {
            rotate_degrees,
            ..Self::default()
        }
    }

    /// True when applying the delta would leave the transform unchanged.
    pub fn is_identity(&self) -> bool {
        self.translate == DVec2::ZERO && self.scale == 1.0 && self.rotate_degrees == 0.0
    }
}

/// Scale about `pivot` by the uniform factor `scale`.
fn scale_about(pivot: DVec2, scale: f64) -> DAffine2 {
    DAffine2::from_translation(pivot)
        * DAffine2::from_scale(DVec2::splat(scale))
        * DAffine2::from_translation(-pivot)
}

/// Rotate about `pivot` by `degrees` (clockwise on screen).
fn rotate_about(pivot: DVec2, degrees: f64) -> DAffine2 {
    DAffine2::from_translation(pivot)
        * DAffine2::from_angle(degrees.to_radians())
        * DAffine2::from_translation(-pivot)
}

/// Transform of a single overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    base: Rect,
    matrix: DAffine2,
    center: DVec2,
    total_scale: f64,
    total_degree: f64,
}

impl TransformState {
    /// Identity transform over `base`.
    pub fn new(base: Rect) -> Self {
        Self {
            base,
            matrix: DAffine2::IDENTITY,
            center: base.center(),
            total_scale: 1.0,
            total_degree: 0.0,
        }
    }

    /// A state whose base rectangle has been rotated by `degree` about its own
    /// center and then moved so that its center sits on `center`.
    ///
    /// This is how an imported record is re-hydrated: the base rectangle is the
    /// default (centered) placement and the matrix carries the saved pose.
    pub fn with_pose(base: Rect, center: DVec2, degree: f64) -> Self {
        let pivot = base.center();
        let matrix = DAffine2::from_translation(center - pivot) * rotate_about(pivot, degree);
        let mut state = Self {
            base,
            matrix,
            center,
            total_scale: 1.0,
            total_degree: normalize_degrees(degree),
        };
        state.update_center();
        state
    }

    pub fn base(&self) -> Rect {
        self.base
    }

    pub fn matrix(&self) -> DAffine2 {
        self.matrix
    }

    /// Base rectangle corners mapped through the matrix, clockwise from top-left.
    pub fn corners(&self) -> Quad {
        Quad::from_points(self.base.corners().map(|p| self.matrix.transform_point2(p)))
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn scale(&self) -> f64 {
        self.total_scale
    }

    pub fn degree(&self) -> f64 {
        self.total_degree
    }

    /// On-screen size of the overlay (base size times total scale).
    pub fn scaled_size(&self) -> Size {
        Size::new(
            self.base.width() * self.total_scale,
            self.base.height() * self.total_scale,
        )
    }

    /// The axis-aligned rectangle the overlay covers once its rotation is undone.
    pub fn upright_rect(&self) -> Rect {
        let upright = rotate_about(self.center, -self.total_degree) * self.matrix;
        let points = self.base.corners().map(|p| upright.transform_point2(p));
        Rect::bounding(&points)
    }

    /// Point-in-polygon test against the transformed corners.
    pub fn contains(&self, point: DVec2) -> bool {
        self.corners().contains(point)
    }

    /// Back to the identity transform.
    pub fn reset(&mut self) {
        *self = Self::new(self.base);
    }

    /// Replace the base rectangle after the content changed size.
    ///
    /// The new base is centered on the current center, scale returns to 1 and
    /// the rotation is kept.
    pub fn rebase(&mut self, size: Size) {
        let size = size.sanitized();
        self.base = Rect::from_center_size(self.center, size);
        self.matrix = rotate_about(self.center, self.total_degree);
        self.total_scale = 1.0;
        self.update_center();
    }

    /// Post-compose `delta` onto the current matrix and refresh the center.
    pub fn compose(&mut self, delta: TransformDelta) {
        if delta.translate != DVec2::ZERO {
            self.matrix = DAffine2::from_translation(delta.translate) * self.matrix;
            self.update_center();
        }
        if delta.scale != 1.0 {
            self.matrix = scale_about(self.center, delta.scale) * self.matrix;
            self.total_scale *= delta.scale;
            self.update_center();
        }
        if delta.rotate_degrees != 0.0 {
            self.matrix = rotate_about(self.center, delta.rotate_degrees) * self.matrix;
            self.total_degree = normalize_degrees(self.total_degree + delta.rotate_degrees);
            self.update_center();
        }
    }

    /// Copy of the state with `delta` applied.
    pub fn composed(&self, delta: TransformDelta) -> Self {
        let mut next = *self;
        next.compose(delta);
        next
    }

    fn update_center(&mut self) {
        self.center = self.corners().centroid();
    }
}
