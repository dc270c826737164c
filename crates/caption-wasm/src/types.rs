//! JavaScript-facing shapes for overlay geometry.
//!
//! Core geometry uses glam vectors, which serialize as `[x, y]` arrays. The
//! drawing side of a page wants named fields, so frames are flattened into
//! these plain structs before crossing the boundary.

use caption_core::{CaptionError, Overlay, Rect, Size, TextStyle};
use glam::DVec2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// A point in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsPoint {
    pub x: f64,
    pub y: f64,
}

impl From<DVec2> for JsPoint {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Axis-aligned rectangle, used for handle hit areas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl From<Rect> for JsRect {
    fn from(r: Rect) -> Self {
        Self {
            left: r.left,
            top: r.top,
            right: r.right,
            bottom: r.bottom,
        }
    }
}

/// Measured size returned by a host text-measure callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsSize {
    pub width: f64,
    pub height: f64,
}

impl From<JsSize> for Size {
    fn from(s: JsSize) -> Self {
        Size::new(s.width, s.height)
    }
}

/// Everything a page needs to draw one overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsOverlayFrame {
    pub id: u32,
    /// Left-top, right-top, right-bottom, left-bottom.
    pub corners: [JsPoint; 4],
    pub center: JsPoint,
    pub scale: f64,
    pub degree: f64,
    pub focused: bool,
    pub enabled: bool,
    pub delete_handle: JsRect,
    pub corner_handle: JsRect,
    /// Style at the current scale; absent for image captions.
    pub text_style: Option<TextStyle>,
}

impl JsOverlayFrame {
    pub(crate) fn from_overlay(overlay: &Overlay, icon_size: f64) -> Self {
        Self {
            id: overlay.id().0,
            corners: overlay.corners().points().map(JsPoint::from),
            center: overlay.center().into(),
            scale: overlay.scale(),
            degree: overlay.degree(),
            focused: overlay.is_focused(),
            enabled: overlay.is_enabled(),
            delete_handle: overlay.delete_handle(icon_size).into(),
            corner_handle: overlay.corner_handle(icon_size).into(),
            text_style: overlay.text_style(),
        }
    }
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

pub(crate) fn js_error(e: CaptionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
