//! Text measurement for both font kinds.
//!
//! Scalable fonts report the tight ink bounding box of the laid-out string,
//! not the nominal line height; the offsets record where that box sits
//! relative to the layout origin so drawing can position the ink itself.
//! The fixed-size built-in font measures whole glyph cells at its integer
//! upscale factor, with zero offsets. Both paths guarantee a box of at least
//! 1×1 so centering math downstream never degenerates.

use rusttype::{point, Scale};

use super::builtin;
use super::font::{Face, ResolvedFont};

/// Ink bounding box of a string, plus the offset of the ink relative to the
/// glyph layout origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TextMetrics {
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// Measure `text` at the resolved font's size. Total: whitespace-only and
/// empty input yield a 1×1 box.
pub fn measure(font: &ResolvedFont, text: &str) -> TextMetrics {
    match &font.face {
        Face::Scalable(face) => measure_scalable(face, font.size, text),
        Face::Fixed => {
            let scale = builtin::scale_for(font.size);
            let (width, height) = builtin::measure(text, scale);
            TextMetrics { width, height, x_offset: 0, y_offset: 0 }
        }
    }
}

fn measure_scalable(face: &rusttype::Font<'static>, size: f32, text: &str) -> TextMetrics {
    let scale = Scale::uniform(size);
    let v_metrics = face.v_metrics(scale);

    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;
    for glyph in face.layout(text, scale, point(0.0, v_metrics.ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            min_x = min_x.min(bb.min.x);
            min_y = min_y.min(bb.min.y);
            max_x = max_x.max(bb.max.x);
            max_y = max_y.max(bb.max.y);
        }
    }

    if min_x == i32::MAX {
        // No ink at all (empty, whitespace, or zero-extent glyphs).
        return TextMetrics { width: 1, height: 1, x_offset: 0, y_offset: 0 };
    }

    TextMetrics {
        width: ((max_x - min_x).max(1)) as u32,
        height: ((max_y - min_y).max(1)) as u32,
        x_offset: min_x,
        y_offset: min_y,
    }
}
