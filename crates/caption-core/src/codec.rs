//! Resolution-independent caption geometry.
//!
//! A [`GeometryRecord`] stores where a caption sits as fractions of its
//! container, so it can be restored into a container of any size. The
//! rotation is kept separately and undone before measuring, so the stored
//! size is the caption's own size, not its rotated bounding box.

use glam::DVec2;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::content::CaptionContent;
use crate::error::CaptionError;
use crate::geometry::{normalize_degrees, Rect, Size};
use crate::transform::TransformState;

/// Smallest relative edge a record may carry.
pub const MIN_RELATIVE_SIZE: f64 = 1e-4;

/// Stored caption size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum RecordSize {
    /// Fractions of the container width and height.
    Relative { width: f64, height: f64 },
    /// Pixels, as written by older exporters that did not know the container.
    Absolute { width: f64, height: f64 },
}

impl RecordSize {
    /// Pixel size inside `container`.
    pub fn resolve(&self, container: Size) -> Size {
        match *self {
            RecordSize::Relative { width, height } => {
                Size::new(width * container.width, height * container.height)
            }
            RecordSize::Absolute { width, height } => Size::new(width, height),
        }
    }
}

/// Exported caption geometry plus its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    /// Center as fractions of the container width and height.
    pub center: DVec2,
    pub size: RecordSize,
    /// Clockwise rotation in degrees, `[0, 360)`.
    pub degree: f64,
    /// Content with text style already multiplied by the caption's scale.
    pub content: CaptionContent,
}

impl GeometryRecord {
    /// Capture `state` inside `container`.
    pub fn export(state: &TransformState, container: Size, content: &CaptionContent) -> Self {
        let container = container.sanitized();
        let upright = state.upright_rect();
        let content = match content {
            CaptionContent::Text(caption) => {
                let mut caption = caption.clone();
                caption.style = caption.style.scaled(state.scale());
                CaptionContent::Text(caption)
            }
            CaptionContent::Image(_) => content.clone(),
        };
        Self {
            center: upright.center() / container.as_vec(),
            size: RecordSize::Relative {
                width: upright.width() / container.width,
                height: upright.height() / container.height,
            },
            degree: normalize_degrees(state.degree()),
            content,
        }
    }

    /// Rebuild a transform inside `container`.
    ///
    /// The base rectangle is placed at the container center, rotated about that
    /// center and then moved onto the stored center, with scale 1.
    pub fn import(&self, container: Size, max_border_scale: f64) -> TransformState {
        let container = container.sanitized();
        let record = self.sanitized(max_border_scale);
        let size = record.size.resolve(container).sanitized();
        let base = Rect::from_center_size(container.center(), size);
        let center = record.center * container.as_vec();
        TransformState::with_pose(base, center, record.degree)
    }

    /// Axis-aligned rectangle the upright caption occupies when rendered into
    /// `target`, e.g. a full-resolution export of the image.
    pub fn render_rect(&self, target: Size) -> Rect {
        let target = target.sanitized();
        Rect::from_center_size(self.center * target.as_vec(), self.size.resolve(target))
    }

    /// Hit-test the stored caption as it would appear in `container`.
    pub fn contains(&self, container: Size, max_border_scale: f64, point: DVec2) -> bool {
        self.import(container, max_border_scale).contains(point)
    }

    /// Copy with every field forced into its valid range.
    ///
    /// Centers clamp to `[0, 1]`. Relative sizes are at least
    /// `MIN_RELATIVE_SIZE` and an oversized pair shrinks by one factor until
    /// both edges are within `max_border_scale`. Absolute sizes to at least 1px and the degree is
    /// normalized. Non-finite values fall back to the center of the container,
    /// the minimum size and no rotation.
    pub fn sanitized(&self, max_border_scale: f64) -> Self {
        let fraction = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 };
        let relative = |v: f64| {
            if v.is_finite() {
                v.max(MIN_RELATIVE_SIZE)
            } else {
                MIN_RELATIVE_SIZE
            }
        };

        let center = DVec2::new(fraction(self.center.x), fraction(self.center.y));
        let size = match self.size {
            RecordSize::Relative { width, height } => {
                let (width, height) = (relative(width), relative(height));
                // One factor for both edges keeps the aspect ratio
                let limit = max_border_scale.max(MIN_RELATIVE_SIZE);
                let factor = (limit / width).min(limit / height).min(1.0);
                RecordSize::Relative {
                    width: (width * factor).max(MIN_RELATIVE_SIZE),
                    height: (height * factor).max(MIN_RELATIVE_SIZE),
                }
            }
            RecordSize::Absolute { width, height } => {
                let size = Size::new(width, height).sanitized();
                RecordSize::Absolute {
                    width: size.width,
                    height: size.height,
                }
            }
        };
        let degree = if self.degree.is_finite() {
            normalize_degrees(self.degree)
        } else {
            0.0
        };

        let record = Self {
            center,
            size,
            degree,
            content: self.content.clone(),
        };
        if record != *self {
            warn!("clamped malformed geometry record: {:?} -> {:?}", self, record);
        }
        record
    }

    pub fn to_json(&self) -> Result<String, CaptionError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CaptionError> {
        Ok(serde_json::from_str(json)?)
    }
}
