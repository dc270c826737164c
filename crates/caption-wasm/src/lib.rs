//! Caption WASM - WebAssembly bindings for the caption overlay engine
//!
//! This crate exposes caption-core to a browser page that draws an image with
//! movable text and sticker captions on top of it.
//!
//! # Module Structure
//!
//! - `layout` - `CaptionLayout`, one per displayed image: pointer input,
//!   focus, drawing frames, export and import
//! - `record` - stateless helpers over exported geometry records
//! - `types` - JavaScript-friendly geometry shapes
//!
//! # Usage
//!
//! ```typescript
//! import init, { CaptionLayout } from '@caption/wasm';
//!
//! await init();
//! const layout = new CaptionLayout(1080, 1920, { touch_slop: 10 });
//! const id = layout.add_text("Hello", undefined, measure);
//! for (const event of layout.pointer_down(0, 540, 960, performance.now())) {
//!   if (event.type === "delete_handle_click") layout.remove(event.overlay);
//! }
//! ```

use log::debug;
use wasm_bindgen::prelude::*;

mod layout;
mod record;
mod types;

pub use layout::CaptionLayout;
pub use record::{image_size, record_contains, record_render_rect};
pub use types::{JsOverlayFrame, JsPoint, JsRect, JsSize};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (e.g. the module loaded twice) keeps the first logger
    if console_log::init_with_level(log_level()).is_ok() {
        debug!("caption-wasm {} ready", version());
    }
}

/// Per-pointer debug output only in debug builds.
fn log_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
