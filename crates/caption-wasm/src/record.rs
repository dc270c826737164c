//! Stateless helpers over exported geometry records.
//!
//! These work on a stored record directly, e.g. to hit-test or composite a
//! caption on a full-resolution export without building a layout.

use caption_core::{image_size_from_bytes, GeometryRecord, Size};
use glam::DVec2;
use wasm_bindgen::prelude::*;

use crate::types::{from_js, js_error, to_js, JsRect, JsSize};

/// Whether `(x, y)` falls on the caption stored in `record` when shown in a
/// `width` x `height` container.
#[wasm_bindgen]
pub fn record_contains(
    record: JsValue,
    width: f64,
    height: f64,
    max_border_scale: f64,
    x: f64,
    y: f64,
) -> Result<bool, JsValue> {
    let record: GeometryRecord = from_js(record, "geometry record")?;
    Ok(record.contains(
        Size::new(width, height),
        max_border_scale,
        DVec2::new(x, y),
    ))
}

/// Upright rectangle the caption occupies when rendered into a target of
/// `width` x `height`, as `{ left, top, right, bottom }`. Rotate by the
/// record's `degree` about the rectangle's center to draw it.
#[wasm_bindgen]
pub fn record_render_rect(record: JsValue, width: f64, height: f64) -> Result<JsValue, JsValue> {
    let record: GeometryRecord = from_js(record, "geometry record")?;
    to_js(&render_rect(&record, width, height))
}

/// Pixel size of an encoded image read from its header, as `{ width, height }`.
#[wasm_bindgen]
pub fn image_size(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let size = image_size_from_bytes(bytes).map_err(js_error)?;
    to_js(&JsSize {
        width: size.width,
        height: size.height,
    })
}

fn render_rect(record: &GeometryRecord, width: f64, height: f64) -> JsRect {
    record.render_rect(Size::new(width, height)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_core::{CaptionContent, RecordSize};

    fn record() -> GeometryRecord {
        GeometryRecord {
            center: DVec2::new(0.25, 0.5),
            size: RecordSize::Relative {
                width: 0.1,
                height: 0.2,
            },
            degree: 30.0,
            content: CaptionContent::image("logo.png"),
        }
    }

    #[test]
    fn test_render_rect_scales_with_target() {
        let rect = render_rect(&record(), 4000.0, 2000.0);
        assert_eq!(
            rect,
            JsRect {
                left: 800.0,
                top: 800.0,
                right: 1200.0,
                bottom: 1200.0
            }
        );
    }
}
