//! Badge rendering pipeline: category color lookup, font resolution, text
//! measurement, placement, compositing, and JPEG encoding.

pub mod builtin;
pub mod colors;
pub mod font;
pub mod layout;
pub mod measure;

use image::{codecs::jpeg::JpegEncoder, ExtendedColorType, ImageEncoder, Rgb, RgbImage, RgbaImage};
use rusttype::{point, Scale};
use thiserror::Error;
use tracing::debug;

use self::font::{Face, FontResolver, ResolvedFont};
use self::layout::{Placement, CANVAS_HEIGHT, CANVAS_WIDTH};
use self::measure::TextMetrics;

/// Caller-facing default when no font size is supplied.
pub const DEFAULT_FONT_SIZE: u32 = 75;

const JPEG_QUALITY: u8 = 95;
const DPI: u16 = 300;

#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("failed to decode foreground image: {0}")]
    ForegroundDecode(image::ImageError),
    #[error("failed to encode badge jpeg: {0}")]
    Encode(image::ImageError),
}

/// One badge render. Everything here lives for exactly one call to
/// [`render_badge`].
#[derive(Clone, Debug)]
pub struct BadgeRequest {
    /// Encoded foreground image, ideally PNG with alpha from the
    /// background-removal step.
    pub foreground: Vec<u8>,
    pub name: String,
    pub category: String,
    pub font_size: u32,
}

impl BadgeRequest {
    pub fn new(foreground: Vec<u8>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            foreground,
            name: name.into(),
            category: category.into(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size.max(1);
        self
    }
}

/// What the render actually did, returned alongside the image so the caller
/// decides how to log or assert on it.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RenderDiagnostics {
    pub font_source: String,
    pub font_scalable: bool,
    pub background: String,
    pub text: TextMetrics,
    pub text_x: i32,
    pub text_y: i32,
    pub photo_x: i32,
    pub photo_y: i32,
    pub photo_width: u32,
    pub photo_height: u32,
}

/// Render with the default font chain.
pub fn render_badge(request: &BadgeRequest) -> Result<(Vec<u8>, RenderDiagnostics), BadgeError> {
    render_badge_with(&FontResolver::default(), request)
}

/// Render a badge: 600×900 RGB canvas in the category color, the foreground
/// composited with alpha honored, and the name drawn with an 8-direction
/// outline stroke under the fill. Returns JPEG bytes (quality 95, 300 DPI
/// density) plus diagnostics.
pub fn render_badge_with(
    resolver: &FontResolver,
    request: &BadgeRequest,
) -> Result<(Vec<u8>, RenderDiagnostics), BadgeError> {
    let background = colors::background_for(&request.category);

    let decode_timer = crate::perf::stage("decode");
    let foreground = image::load_from_memory(&request.foreground)
        .map_err(BadgeError::ForegroundDecode)?
        .to_rgba8();
    drop(decode_timer);

    let font = {
        let _t = crate::perf::stage("resolve_font");
        resolver.resolve(request.font_size as f32)
    };
    let metrics = {
        let _t = crate::perf::stage("measure");
        measure::measure(&font, &request.name)
    };

    let (photo_w, photo_h) = layout::fit_photo(foreground.width(), foreground.height());
    let placement = layout::layout(photo_w, photo_h, &metrics, background);
    debug!(?placement, ?metrics, background, "badge layout");

    let composite_timer = crate::perf::stage("composite");
    let mut canvas: RgbImage =
        RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, colors::parse_color(background));

    let photo = if (photo_w, photo_h) == (foreground.width(), foreground.height()) {
        foreground
    } else {
        let filter = image::imageops::FilterType::Lanczos3;
        image::imageops::resize(&foreground, photo_w, photo_h, filter)
    };
    overlay_alpha(&mut canvas, &photo, placement.photo_x, placement.photo_y);

    draw_name(&mut canvas, &font, &request.name, &metrics, &placement);
    drop(composite_timer);

    let encode_timer = crate::perf::stage("encode");
    let mut buf = Vec::new();
    let enc = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    enc.write_image(canvas.as_raw(), CANVAS_WIDTH, CANVAS_HEIGHT, ExtendedColorType::Rgb8)
        .map_err(BadgeError::Encode)?;
    stamp_jfif_density(&mut buf, DPI);
    drop(encode_timer);

    let diagnostics = RenderDiagnostics {
        font_source: font.source.clone(),
        font_scalable: font.is_scalable(),
        background: background.to_string(),
        text: metrics,
        text_x: placement.text_x,
        text_y: placement.text_y,
        photo_x: placement.photo_x,
        photo_y: placement.photo_y,
        photo_width: placement.photo_width,
        photo_height: placement.photo_height,
    };
    Ok((buf, diagnostics))
}

/// Outline stroke at every ±1 offset, then the fill on top. A cheap
/// 8-direction approximation of a glyph outline.
fn draw_name(
    canvas: &mut RgbImage,
    font: &ResolvedFont,
    name: &str,
    metrics: &TextMetrics,
    placement: &Placement,
) {
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if (dx, dy) == (0, 0) {
                continue;
            }
            draw_text(
                canvas,
                font,
                name,
                metrics,
                placement.text_x + dx,
                placement.text_y + dy,
                placement.outline,
            );
        }
    }
    draw_text(canvas, font, name, metrics, placement.text_x, placement.text_y, placement.fill);
}

/// Draw `text` so its ink bounding box's top-left corner lands at `(x, y)`.
fn draw_text(
    img: &mut RgbImage,
    font: &ResolvedFont,
    text: &str,
    metrics: &TextMetrics,
    x: i32,
    y: i32,
    color: Rgb<u8>,
) {
    match &font.face {
        Face::Scalable(face) => {
            let scale = Scale::uniform(font.size);
            let v_metrics = face.v_metrics(scale);
            // Shift the layout origin so the measured ink box starts at (x, y).
            let origin = point(
                (x - metrics.x_offset) as f32,
                (y - metrics.y_offset) as f32 + v_metrics.ascent,
            );
            for glyph in face.layout(text, scale, origin) {
                if let Some(bb) = glyph.pixel_bounding_box() {
                    glyph.draw(|gx, gy, v| {
                        let px = gx as i32 + bb.min.x;
                        let py = gy as i32 + bb.min.y;
                        if px < 0 || py < 0 {
                            return;
                        }
                        let (px, py) = (px as u32, py as u32);
                        if px >= img.width() || py >= img.height() {
                            return;
                        }
                        if v <= 0.0 {
                            return;
                        }
                        let dst = img.get_pixel_mut(px, py);
                        let inv = 1.0 - v;
                        dst.0[0] = (color.0[0] as f32 * v + dst.0[0] as f32 * inv) as u8;
                        dst.0[1] = (color.0[1] as f32 * v + dst.0[1] as f32 * inv) as u8;
                        dst.0[2] = (color.0[2] as f32 * v + dst.0[2] as f32 * inv) as u8;
                    });
                }
            }
        }
        Face::Fixed => {
            builtin::draw(img, text, x, y, builtin::scale_for(font.size), color);
        }
    }
}

/// Alpha-composite `over` onto the RGB canvas at a signed position. Fully
/// transparent source pixels leave the canvas untouched; out-of-bounds
/// regions are clipped.
fn overlay_alpha(base: &mut RgbImage, over: &RgbaImage, x: i32, y: i32) {
    for oy in 0..over.height() {
        for ox in 0..over.width() {
            let p = over.get_pixel(ox, oy);
            let a = p.0[3] as f32 / 255.0;
            if a <= 0.0 {
                continue;
            }
            let bx = x + ox as i32;
            let by = y + oy as i32;
            if bx < 0 || by < 0 {
                continue;
            }
            let (bx, by) = (bx as u32, by as u32);
            if bx >= base.width() || by >= base.height() {
                continue;
            }
            let dst = base.get_pixel_mut(bx, by);
            let inv = 1.0 - a;
            dst.0[0] = (p.0[0] as f32 * a + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (p.0[1] as f32 * a + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (p.0[2] as f32 * a + dst.0[2] as f32 * inv) as u8;
        }
    }
}

/// Overwrite the JFIF APP0 density fields in place: units = dots-per-inch,
/// X/Y density = `dpi`. Leaves the buffer untouched if the encoder did not
/// emit a leading JFIF segment.
fn stamp_jfif_density(jpeg: &mut [u8], dpi: u16) {
    if jpeg.len() < 18 {
        return;
    }
    let has_jfif = jpeg[0] == 0xFF
        && jpeg[1] == 0xD8
        && jpeg[2] == 0xFF
        && jpeg[3] == 0xE0
        && &jpeg[6..11] == b"JFIF\0";
    if !has_jfif {
        return;
    }
    let [hi, lo] = dpi.to_be_bytes();
    jpeg[13] = 1; // density units: dots per inch
    jpeg[14] = hi;
    jpeg[15] = lo;
    jpeg[16] = hi;
    jpeg[17] = lo;
}
