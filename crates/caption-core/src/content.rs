//! Caption content and base-rectangle sizing.
//!
//! Glyph layout belongs to the host, so text is measured through the
//! [`ContentSizer`] trait. This module only adds padding, shrinks oversized
//! text to fit the container, and reads intrinsic image sizes from encoded
//! headers.

use std::io::Cursor;

use image::ImageReader;
use serde::{Deserialize, Serialize};

use crate::error::CaptionError;
use crate::geometry::Size;

/// Default padding around caption text, in pixels.
pub const DEFAULT_PADDING: f64 = 8.0;

/// Horizontal text alignment inside the caption box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    #[default]
    Normal,
    Center,
    Opposite,
}

/// Space between the text and the caption border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(DEFAULT_PADDING)
    }
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            left: self.left * factor,
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
        }
    }
}

/// Visual style of a text caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size: f64,
    /// ARGB.
    pub text_color: u32,
    /// ARGB.
    pub border_color: u32,
    pub typeface: Option<String>,
    pub alignment: TextAlignment,
    pub padding: Padding,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 28.0,
            text_color: 0xFFFF_FFFF,
            border_color: 0xFFFF_FFFF,
            typeface: None,
            alignment: TextAlignment::Normal,
            padding: Padding::default(),
        }
    }
}

impl TextStyle {
    /// The style as drawn at `scale`: font size and padding grow with the overlay.
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            font_size: self.font_size * scale,
            padding: self.padding.scaled(scale),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCaption {
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCaption {
    /// Opaque reference the host resolves to pixels (URL, asset key, ...).
    pub source: String,
}

/// What a caption shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptionContent {
    Text(TextCaption),
    Image(ImageCaption),
}

impl CaptionContent {
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        CaptionContent::Text(TextCaption {
            text: text.into(),
            style,
        })
    }

    pub fn image(source: impl Into<String>) -> Self {
        CaptionContent::Image(ImageCaption {
            source: source.into(),
        })
    }

    /// Image captions can only be moved.
    pub fn is_image(&self) -> bool {
        matches!(self, CaptionContent::Image(_))
    }
}

/// Host-provided measurement of content that the engine cannot lay out itself.
pub trait ContentSizer {
    /// Extent of `text` laid out on unbounded width with `style`, without padding.
    fn measure_text(&self, text: &str, style: &TextStyle) -> Size;

    /// Intrinsic pixel size of the image behind `source`, if known.
    fn image_size(&self, source: &str) -> Option<Size>;
}

/// Text extent plus padding.
pub fn padded_size(extent: Size, padding: &Padding) -> Size {
    Size::new(
        extent.width + padding.horizontal(),
        extent.height + padding.vertical(),
    )
}

/// Shrink `font_size` so the text extent fits the container (minus padding)
/// times `max_border_scale`. Text never grows.
///
/// `extent` is the text measured at `font_size`; the extent scales linearly
/// with the font size.
pub fn fit_font_size(
    font_size: f64,
    extent: Size,
    container: Size,
    padding: &Padding,
    max_border_scale: f64,
) -> f64 {
    let available_width = (container.width - padding.horizontal()) * max_border_scale;
    let available_height = (container.height - padding.vertical()) * max_border_scale;
    if available_width <= 0.0 || available_height <= 0.0 || extent.is_degenerate() {
        return font_size;
    }
    let resize = (available_width / extent.width).min(available_height / extent.height);
    if resize < 1.0 {
        font_size * resize
    } else {
        font_size
    }
}

/// Shrink `size` uniformly so neither edge exceeds the container edge times
/// `max_border_scale`. Sizes that already fit are returned unchanged.
pub fn fit_base_size(size: Size, container: Size, max_border_scale: f64) -> Size {
    let size = size.sanitized();
    if container.is_degenerate() || !max_border_scale.is_finite() || max_border_scale <= 0.0 {
        return size;
    }
    let factor = (container.width * max_border_scale / size.width)
        .min(container.height * max_border_scale / size.height);
    if factor < 1.0 {
        Size::new(size.width * factor, size.height * factor).sanitized()
    } else {
        size
    }
}

/// Base size of `content` in a container, shrinking text that would not fit.
///
/// Returns the possibly reduced text style alongside the size so the caller
/// can store it. Unknown image sizes fall back to the 1px minimum.
pub fn measure_content(
    content: &CaptionContent,
    sizer: &dyn ContentSizer,
    container: Size,
    max_border_scale: f64,
) -> (Size, Option<TextStyle>) {
    match content {
        CaptionContent::Text(caption) => {
            let mut style = caption.style.clone();
            let extent = sizer.measure_text(&caption.text, &style);
            let fitted = fit_font_size(
                style.font_size,
                extent,
                container,
                &style.padding,
                max_border_scale,
            );
            let extent = if fitted < style.font_size {
                style.font_size = fitted;
                sizer.measure_text(&caption.text, &style)
            } else {
                extent
            };
            (padded_size(extent, &style.padding).sanitized(), Some(style))
        }
        CaptionContent::Image(caption) => {
            let size = sizer.image_size(&caption.source).unwrap_or_default();
            (fit_base_size(size, container, max_border_scale), None)
        }
    }
}

/// Read the pixel size from an encoded image header without decoding pixels.
pub fn image_size_from_bytes(bytes: &[u8]) -> Result<Size, CaptionError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CaptionError::UnreadableImage(e.to_string()))?;
    let (width, height) = reader.into_dimensions()?;
    Ok(Size::new(width as f64, height as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Monospace sizer: every char is 0.5em wide, one line is 1.25em high.
    struct Mono;

    impl ContentSizer for Mono {
        fn measure_text(&self, text: &str, style: &TextStyle) -> Size {
            let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            let lines = text.lines().count().max(1);
            Size::new(
                longest as f64 * style.font_size * 0.5,
                lines as f64 * style.font_size * 1.25,
            )
        }

        fn image_size(&self, source: &str) -> Option<Size> {
            (source == "sticker.png").then(|| Size::new(64.0, 48.0))
        }
    }

    #[test]
    fn test_padded_size() {
        let size = padded_size(Size::new(100.0, 40.0), &Padding::uniform(8.0));
        assert_eq!(size, Size::new(116.0, 56.0));
    }

    #[test]
    fn test_fit_font_size_shrinks_wide_text() {
        // 2000px of text in a 1000px container with 1.5x headroom: (1000 - 16) * 1.5 available
        let padding = Padding::uniform(8.0);
        let font = fit_font_size(
            40.0,
            Size::new(2000.0, 50.0),
            Size::new(1000.0, 1000.0),
            &padding,
            1.5,
        );
        let expected = 40.0 * (1000.0 - 16.0) * 1.5 / 2000.0;
        assert!((font - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fit_font_size_never_grows() {
        let font = fit_font_size(
            20.0,
            Size::new(100.0, 25.0),
            Size::new(1000.0, 1000.0),
            &Padding::default(),
            1.5,
        );
        assert_eq!(font, 20.0);
    }

    #[test]
    fn test_fit_font_size_degenerate_container() {
        let font = fit_font_size(
            20.0,
            Size::new(100.0, 25.0),
            Size::new(10.0, 10.0),
            &Padding::uniform(8.0),
            1.0,
        );
        assert_eq!(font, 20.0);
    }

    #[test]
    fn test_measure_text_content() {
        let content = CaptionContent::text(
            "hello",
            TextStyle {
                font_size: 40.0,
                ..TextStyle::default()
            },
        );
        let (size, style) = measure_content(&content, &Mono, Size::new(1000.0, 1000.0), 1.5);
        // 5 chars * 20px + 16 padding, 50px line + 16 padding
        assert_eq!(size, Size::new(116.0, 66.0));
        assert_eq!(style.unwrap().font_size, 40.0);
    }

    #[test]
    fn test_measure_text_shrinks_to_fit() {
        let content = CaptionContent::text(
            "x".repeat(200),
            TextStyle {
                font_size: 40.0,
                padding: Padding::uniform(0.0),
                ..TextStyle::default()
            },
        );
        let (size, style) = measure_content(&content, &Mono, Size::new(1000.0, 1000.0), 1.5);
        assert!((size.width - 1500.0).abs() < 1e-9);
        assert!(style.unwrap().font_size < 40.0);
    }

    #[test]
    fn test_measure_image_content() {
        let (size, style) = measure_content(
            &CaptionContent::image("sticker.png"),
            &Mono,
            Size::new(1000.0, 1000.0),
            1.5,
        );
        assert_eq!(size, Size::new(64.0, 48.0));
        assert!(style.is_none());

        let (size, _) = measure_content(
            &CaptionContent::image("missing.png"),
            &Mono,
            Size::new(1000.0, 1000.0),
            1.5,
        );
        assert_eq!(size, Size::new(1.0, 1.0));
    }

    #[test]
    fn test_fit_base_size_keeps_aspect() {
        let container = Size::new(1000.0, 1000.0);
        assert_eq!(
            fit_base_size(Size::new(4000.0, 3000.0), container, 1.5),
            Size::new(1500.0, 1125.0)
        );
        assert_eq!(
            fit_base_size(Size::new(200.0, 3000.0), container, 1.5),
            Size::new(100.0, 1500.0)
        );
        assert_eq!(
            fit_base_size(Size::new(640.0, 480.0), container, 1.5),
            Size::new(640.0, 480.0)
        );
    }

    #[test]
    fn test_text_style_scaled() {
        let style = TextStyle::default().scaled(2.0);
        assert_eq!(style.font_size, 56.0);
        assert_eq!(style.padding, Padding::uniform(16.0));
    }

    #[test]
    fn test_content_json_tagged() {
        let json = serde_json::to_value(CaptionContent::image("a.png")).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["source"], "a.png");

        let content: CaptionContent =
            serde_json::from_str(r#"{ "kind": "text", "text": "hi" }"#).unwrap();
        assert_eq!(content, CaptionContent::text("hi", TextStyle::default()));
    }

    #[test]
    fn test_image_size_from_png_header() {
        let mut bytes = Vec::new();
        let img = image::RgbaImage::new(3, 2);
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(image_size_from_bytes(&bytes).unwrap(), Size::new(3.0, 2.0));
    }

    #[test]
    fn test_image_size_from_garbage() {
        let err = image_size_from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, CaptionError::UnreadableImage(_)));
    }
}
