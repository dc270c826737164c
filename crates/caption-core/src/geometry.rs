//! Plain geometry primitives shared by the engine.
//!
//! Points and vectors are `glam::DVec2` in container pixel space with the
//! origin at the top-left corner and y growing downwards. Because y points
//! down, a positive angle produced by `atan2(dy, dx)` is a clockwise rotation
//! on screen, which matches the rotation `DAffine2::from_angle` applies.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Smallest edge length an overlay may have, in pixels.
pub const MIN_EDGE: f64 = 1.0;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp both edges to at least [`MIN_EDGE`], replacing non-finite values.
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_finite() { v.max(MIN_EDGE) } else { MIN_EDGE };
        Self::new(fix(self.width), fix(self.height))
    }

    /// True if either edge is zero, negative or not a number.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle of `size` centered on `center`.
    pub fn from_center_size(center: DVec2, size: Size) -> Self {
        let half = size.as_vec() / 2.0;
        Self::new(
            center.x - half.x,
            center.y - half.y,
            center.x + half.x,
            center.y + half.y,
        )
    }

    /// Smallest rectangle containing every point.
    pub fn bounding(points: &[DVec2]) -> Self {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self::new(min.x, min.y, max.x, max.y)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Corners clockwise from top-left.
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.left, self.top),
            DVec2::new(self.right, self.top),
            DVec2::new(self.right, self.bottom),
            DVec2::new(self.left, self.bottom),
        ]
    }

    /// Half-open containment, same convention as a platform rect hit test.
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Square of edge `size` centered on `center`, used for handle hit areas.
    pub fn square(center: DVec2, size: f64) -> Self {
        Self::from_center_size(center, Size::new(size, size))
    }
}

/// Four corners of a transformed rectangle, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub left_top: DVec2,
    pub right_top: DVec2,
    pub right_bottom: DVec2,
    pub left_bottom: DVec2,
}

impl Quad {
    pub fn from_points(points: [DVec2; 4]) -> Self {
        Self {
            left_top: points[0],
            right_top: points[1],
            right_bottom: points[2],
            left_bottom: points[3],
        }
    }

    pub fn points(&self) -> [DVec2; 4] {
        [
            self.left_top,
            self.right_top,
            self.right_bottom,
            self.left_bottom,
        ]
    }

    /// Centroid of the four corners.
    pub fn centroid(&self) -> DVec2 {
        (self.left_top + self.right_top + self.right_bottom + self.left_bottom) / 4.0
    }

    /// Point-in-polygon test for the (convex) quadrilateral.
    ///
    /// The point is inside when it lies on the same side of all four edges.
    /// Points exactly on an edge count as inside.
    pub fn contains(&self, point: DVec2) -> bool {
        let pts = self.points();
        let mut sign = 0.0_f64;
        for i in 0..4 {
            let a = pts[i];
            let b = pts[(i + 1) % 4];
            let cross = (b - a).perp_dot(point - a);
            if cross == 0.0 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        // A collapsed quad has no interior
        sign != 0.0
    }
}

/// Angle of `v` in degrees, measured by `atan2(y, x)`.
pub fn angle_degrees(v: DVec2) -> f64 {
    v.y.atan2(v.x).to_degrees()
}

/// Wrap an angle difference into `(-180, 180]`.
pub fn wrap_degrees(delta: f64) -> f64 {
    let mut d = delta % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Normalize an absolute angle into `[0, 360)`.
pub fn normalize_degrees(degree: f64) -> f64 {
    let d = degree.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}
