//! The caption layout handle a page keeps for one image.
//!
//! Pointer events go in, notifications come back as an array of tagged
//! objects (`{ type: "gesture_start", overlay: 1 }` and so on). Drawing reads
//! [`JsOverlayFrame`]s.
//!
//! ```typescript
//! const layout = new CaptionLayout(canvas.width, canvas.height, undefined);
//! const id = layout.add_text("Hello", { font_size: 32 }, (text, style) => {
//!   ctx.font = `${style.font_size}px sans-serif`;
//!   const m = ctx.measureText(text);
//!   return { width: m.width, height: style.font_size * 1.25 };
//! });
//! canvas.onpointerdown = (e) =>
//!   handle(layout.pointer_down(e.pointerId, e.offsetX, e.offsetY, e.timeStamp));
//! ```

use std::collections::HashMap;

use caption_core::{
    image_size_from_bytes, CaptionContent, CaptionError, CaptionEvent, Container, ContentSizer,
    EngineConfig, FocusChange, GeometryRecord, OverlayId, PointerEvent, Size, TextStyle,
};
use log::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::types::{from_js, js_error, to_js, JsOverlayFrame, JsSize};

/// Sizes content from a text-measure function and the images registered with
/// the layout.
struct HostSizer<'a, F> {
    measure: F,
    images: &'a HashMap<String, Size>,
}

impl<F> ContentSizer for HostSizer<'_, F>
where
    F: Fn(&str, &TextStyle) -> Size,
{
    fn measure_text(&self, text: &str, style: &TextStyle) -> Size {
        (self.measure)(text, style)
    }

    fn image_size(&self, source: &str) -> Option<Size> {
        self.images.get(source).copied()
    }
}

/// Call a page's `(text, style) => { width, height }` function.
///
/// A throwing or malformed callback measures as empty; the overlay then
/// falls back to its padding.
fn call_measure(measure: &js_sys::Function, text: &str, style: &TextStyle) -> Size {
    let measured = to_js(style)
        .and_then(|style| measure.call2(&JsValue::NULL, &JsValue::from_str(text), &style))
        .and_then(|value| from_js::<JsSize>(value, "text measurement"));
    match measured {
        Ok(size) => size.into(),
        Err(e) => {
            warn!("text measure callback failed: {:?}", e);
            Size::default()
        }
    }
}

fn focus_events(change: Option<FocusChange>) -> Vec<CaptionEvent> {
    change.map(CaptionEvent::from).into_iter().collect()
}

#[wasm_bindgen]
pub struct CaptionLayout {
    inner: Container,
    images: HashMap<String, Size>,
}

#[wasm_bindgen]
impl CaptionLayout {
    /// Create a layout for a `width` x `height` pixel image.
    ///
    /// `config` is an optional object with any `EngineConfig` fields
    /// (`snap_threshold_degrees`, `touch_slop`, ...); missing fields take
    /// their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config: JsValue) -> Result<CaptionLayout, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            from_js(config, "engine config")?
        };
        Self::with_config(width, height, config).map_err(js_error)
    }

    /// Create a layout with the engine config given as JSON text.
    pub fn from_config_json(
        width: f64,
        height: f64,
        json: &str,
    ) -> Result<CaptionLayout, JsValue> {
        let config = EngineConfig::from_json(json).map_err(js_error)?;
        Self::with_config(width, height, config).map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.size().width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.size().height
    }

    #[wasm_bindgen(getter)]
    pub fn overlay_count(&self) -> usize {
        self.inner.overlays().len()
    }

    /// Ids bottom to top.
    pub fn overlay_ids(&self) -> Vec<u32> {
        self.inner.overlays().iter().map(|o| o.id().0).collect()
    }

    /// Read the pixel size of an encoded image so `add_image` can size it.
    pub fn register_image(&mut self, source: &str, bytes: &[u8]) -> Result<(), JsValue> {
        let size = image_size_from_bytes(bytes).map_err(js_error)?;
        self.register_image_size(source, size.width, size.height);
        Ok(())
    }

    /// Record the pixel size of an image the page has already decoded.
    pub fn register_image_size(&mut self, source: &str, width: f64, height: f64) {
        self.images
            .insert(source.to_string(), Size::new(width, height).sanitized());
    }

    /// Add a text caption. `style` may be undefined or a partial style object.
    pub fn add_text(
        &mut self,
        text: &str,
        style: JsValue,
        measure: &js_sys::Function,
    ) -> Result<u32, JsValue> {
        let style = style_from_js(style)?;
        let content = CaptionContent::text(text, style);
        Ok(self
            .add_measured(content, |t: &str, s: &TextStyle| call_measure(measure, t, s))
            .0)
    }

    /// Add an image caption. The image must be registered first.
    pub fn add_image(&mut self, source: &str) -> Result<u32, JsValue> {
        if !self.images.contains_key(source) {
            return Err(JsValue::from_str(&format!("Unregistered image: {}", source)));
        }
        let content = CaptionContent::image(source);
        Ok(self.add_measured(content, |_: &str, _: &TextStyle| Size::default()).0)
    }

    /// Replace a caption's text and style, keeping its center and rotation.
    pub fn set_text(
        &mut self,
        id: u32,
        text: &str,
        style: JsValue,
        measure: &js_sys::Function,
    ) -> Result<(), JsValue> {
        let style = style_from_js(style)?;
        let content = CaptionContent::text(text, style);
        self.replace_content(OverlayId(id), content, |t: &str, s: &TextStyle| {
            call_measure(measure, t, s)
        })
        .map_err(js_error)
    }

    pub fn remove(&mut self, id: u32) -> Result<(), JsValue> {
        self.inner.remove(OverlayId(id)).map(|_| ()).map_err(js_error)
    }

    pub fn set_enabled(&mut self, id: u32, enabled: bool) -> Result<(), JsValue> {
        self.inner.set_enabled(OverlayId(id), enabled).map_err(js_error)
    }

    pub fn set_scale_rotate_locked(&mut self, id: u32, locked: bool) -> Result<(), JsValue> {
        self.inner
            .set_scale_rotate_locked(OverlayId(id), locked)
            .map_err(js_error)
    }

    pub fn focused(&self) -> Option<u32> {
        self.inner.focused().map(|id| id.0)
    }

    /// Focus `id`. Returns the resulting notifications.
    pub fn request_focus(&mut self, id: u32) -> Result<JsValue, JsValue> {
        let change = self.inner.request_focus(OverlayId(id)).map_err(js_error)?;
        to_js(&focus_events(change))
    }

    pub fn release_focus(&mut self, id: u32) -> Result<JsValue, JsValue> {
        let change = self.inner.release_focus(OverlayId(id)).map_err(js_error)?;
        to_js(&focus_events(change))
    }

    pub fn clear_focus(&mut self) -> Result<JsValue, JsValue> {
        to_js(&focus_events(self.inner.clear_focus()))
    }

    pub fn pointer_down(
        &mut self,
        id: u32,
        x: f64,
        y: f64,
        timestamp_ms: f64,
    ) -> Result<JsValue, JsValue> {
        to_js(&self.dispatch(PointerEvent::down(id, x, y, timestamp_ms)))
    }

    pub fn pointer_move(
        &mut self,
        id: u32,
        x: f64,
        y: f64,
        timestamp_ms: f64,
    ) -> Result<JsValue, JsValue> {
        to_js(&self.dispatch(PointerEvent::moved(id, x, y, timestamp_ms)))
    }

    pub fn pointer_up(
        &mut self,
        id: u32,
        x: f64,
        y: f64,
        timestamp_ms: f64,
    ) -> Result<JsValue, JsValue> {
        to_js(&self.dispatch(PointerEvent::up(id, x, y, timestamp_ms)))
    }

    pub fn pointer_cancel(&mut self, id: u32, timestamp_ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.dispatch(PointerEvent::cancel(id, timestamp_ms)))
    }

    /// Feed a `{ id, x, y, phase, timestamp_ms }` object.
    pub fn pointer_event(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event: PointerEvent = from_js(event, "pointer event")?;
        to_js(&self.dispatch(event))
    }

    /// Drawing data for one overlay.
    pub fn frame(&self, id: u32) -> Result<JsValue, JsValue> {
        to_js(&self.frame_of(OverlayId(id)).map_err(js_error)?)
    }

    /// Drawing data for every overlay, bottom to top.
    pub fn frames(&self) -> Result<JsValue, JsValue> {
        to_js(&self.all_frames())
    }

    /// Geometry record of one overlay as a plain object.
    pub fn export(&self, id: u32) -> Result<JsValue, JsValue> {
        to_js(&self.inner.export(OverlayId(id)).map_err(js_error)?)
    }

    pub fn export_all(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.export_all())
    }

    pub fn export_json(&self, id: u32) -> Result<String, JsValue> {
        self.inner
            .export(OverlayId(id))
            .and_then(|record| record.to_json())
            .map_err(js_error)
    }

    /// Restore a record object produced by `export`, possibly from a layout of
    /// another size.
    pub fn import(&mut self, record: JsValue) -> Result<u32, JsValue> {
        let record: GeometryRecord = from_js(record, "geometry record")?;
        Ok(self.inner.add_from_record(&record).0)
    }

    pub fn import_json(&mut self, json: &str) -> Result<u32, JsValue> {
        let record = GeometryRecord::from_json(json).map_err(js_error)?;
        Ok(self.inner.add_from_record(&record).0)
    }
}

fn style_from_js(style: JsValue) -> Result<TextStyle, JsValue> {
    if style.is_undefined() || style.is_null() {
        Ok(TextStyle::default())
    } else {
        from_js(style, "text style")
    }
}

impl CaptionLayout {
    pub(crate) fn with_config(
        width: f64,
        height: f64,
        config: EngineConfig,
    ) -> Result<Self, CaptionError> {
        let inner = Container::new(Size::new(width, height), config)?;
        debug!("caption layout {}x{}", inner.size().width, inner.size().height);
        Ok(Self {
            inner,
            images: HashMap::new(),
        })
    }

    pub(crate) fn add_measured<F>(&mut self, content: CaptionContent, measure: F) -> OverlayId
    where
        F: Fn(&str, &TextStyle) -> Size,
    {
        let sizer = HostSizer {
            measure,
            images: &self.images,
        };
        self.inner.add_measured(content, &sizer)
    }

    pub(crate) fn replace_content<F>(
        &mut self,
        id: OverlayId,
        content: CaptionContent,
        measure: F,
    ) -> Result<(), CaptionError>
    where
        F: Fn(&str, &TextStyle) -> Size,
    {
        let sizer = HostSizer {
            measure,
            images: &self.images,
        };
        self.inner.set_content(id, content, &sizer)
    }

    pub(crate) fn dispatch(&mut self, event: PointerEvent) -> Vec<CaptionEvent> {
        self.inner.handle_pointer(&event)
    }

    pub(crate) fn frame_of(&self, id: OverlayId) -> Result<JsOverlayFrame, CaptionError> {
        let icon_size = self.inner.config().icon_size;
        self.inner
            .overlay(id)
            .map(|o| JsOverlayFrame::from_overlay(o, icon_size))
            .ok_or(CaptionError::UnknownOverlay(id))
    }

    pub(crate) fn all_frames(&self) -> Vec<JsOverlayFrame> {
        let icon_size = self.inner.config().icon_size;
        self.inner
            .overlays()
            .iter()
            .map(|o| JsOverlayFrame::from_overlay(o, icon_size))
            .collect()
    }
}


/// WASM-specific tests that pass `JsValue`s across the boundary.
///
/// Run with `wasm-pack test --headless --chrome crates/caption-wasm`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn measure() -> js_sys::Function {
        js_sys::Function::new_with_args(
            "text, style",
            "return { width: text.length * style.font_size * 0.5, height: style.font_size };",
        )
    }

    #[wasm_bindgen_test]
    fn test_constructor_with_partial_config() {
        let config = js_sys::JSON::parse(r#"{"touch_slop": 4}"#).unwrap();
        let layout = CaptionLayout::new(640.0, 480.0, config).unwrap();
        assert_eq!(layout.width(), 640.0);
    }

    #[wasm_bindgen_test]
    fn test_constructor_rejects_bad_config() {
        let config = js_sys::JSON::parse(r#"{"max_border_scale": 0.5}"#).unwrap();
        assert!(CaptionLayout::new(640.0, 480.0, config).is_err());
    }

    #[wasm_bindgen_test]
    fn test_add_text_through_callback() {
        let mut layout = CaptionLayout::new(1000.0, 1000.0, JsValue::UNDEFINED).unwrap();
        let style = js_sys::JSON::parse(r#"{"font_size": 20}"#).unwrap();
        let id = layout.add_text("abcd", style, &measure()).unwrap();
        let frame = layout.frame_of(OverlayId(id)).unwrap();
        // 4 * 10 + 16 by 20 + 16
        assert_eq!(frame.corners[2].x - frame.corners[0].x, 56.0);
        assert_eq!(frame.corners[2].y - frame.corners[0].y, 36.0);
    }

    #[wasm_bindgen_test]
    fn test_unregistered_image_rejected() {
        let mut layout = CaptionLayout::new(100.0, 100.0, JsValue::UNDEFINED).unwrap();
        assert!(layout.add_image("missing.png").is_err());
    }

    #[wasm_bindgen_test]
    fn test_export_import_between_sizes() {
        let mut small = CaptionLayout::new(1000.0, 1000.0, JsValue::UNDEFINED).unwrap();
        let id = small.add_text("abcd", JsValue::UNDEFINED, &measure()).unwrap();
        let record = small.export(id).unwrap();

        let mut large = CaptionLayout::new(2000.0, 500.0, JsValue::UNDEFINED).unwrap();
        let restored = large.import(record).unwrap();
        let frame = large.frame_of(OverlayId(restored)).unwrap();
        assert_eq!(frame.center.x, 1000.0);
        assert_eq!(frame.center.y, 250.0);

        let json = small.export_json(id).unwrap();
        assert!(large.import_json(&json).is_ok());
        assert_eq!(large.overlay_count(), 2);
    }

    #[wasm_bindgen_test]
    fn test_pointer_event_object() {
        let mut layout = CaptionLayout::new(1000.0, 1000.0, JsValue::UNDEFINED).unwrap();
        layout.add_text("abcd", JsValue::UNDEFINED, &measure()).unwrap();
        let event =
            js_sys::JSON::parse(r#"{"id": 1, "x": 500, "y": 500, "phase": "down"}"#).unwrap();
        let events = layout.pointer_event(event).unwrap();
        assert!(js_sys::Array::is_array(&events));
        assert_eq!(js_sys::Array::from(&events).length(), 1);
    }

    #[wasm_bindgen_test]
    fn test_unknown_overlay_errors() {
        let mut layout = CaptionLayout::new(100.0, 100.0, JsValue::UNDEFINED).unwrap();
        assert!(layout.remove(7).is_err());
        assert!(layout.request_focus(7).is_err());
        assert!(layout.export(7).is_err());
    }
}
