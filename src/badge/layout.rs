//! Placement of the photo and the name text on the badge canvas.

use image::Rgb;

use super::colors;
use super::measure::TextMetrics;

/// Badge canvas: 2×3 inches at 300 DPI. Product invariant, not configurable.
pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 900;

/// Longest photo edge after downscaling. Photos are never upscaled.
pub const MAX_PHOTO_EDGE: u32 = 700;

/// Photo anchor: fixed margin between the photo's bottom edge and the canvas
/// bottom.
pub const PHOTO_BOTTOM_MARGIN: u32 = 200;

/// Text anchor: fixed margin between the text ink box and the canvas bottom.
pub const TEXT_BOTTOM_MARGIN: u32 = 40;

/// Computed positions for one render. Coordinates are signed because a photo
/// capped at [`MAX_PHOTO_EDGE`] can still be wider than the canvas; the
/// compositor clips.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct Placement {
    pub photo_x: i32,
    pub photo_y: i32,
    pub photo_width: u32,
    pub photo_height: u32,
    pub text_x: i32,
    pub text_y: i32,
    #[serde(skip)]
    pub fill: Rgb<u8>,
    #[serde(skip)]
    pub outline: Rgb<u8>,
}

/// Photo dimensions after the max-edge cap, aspect ratio preserved. Identity
/// for photos already within bounds.
pub fn fit_photo(width: u32, height: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= MAX_PHOTO_EDGE || longest == 0 {
        return (width, height);
    }
    let ratio = MAX_PHOTO_EDGE as f32 / longest as f32;
    (
        ((width as f32 * ratio).round() as u32).max(1),
        ((height as f32 * ratio).round() as u32).max(1),
    )
}

/// Compute placement for a photo of the given (already fitted) size and a
/// measured text box on the given background. Total over all inputs.
pub fn layout(
    photo_width: u32,
    photo_height: u32,
    text: &TextMetrics,
    background: &str,
) -> Placement {
    let (fill, outline) = colors::contrast_colors(background);

    let photo_x = (CANVAS_WIDTH as i32 - photo_width as i32) / 2;
    let photo_y = CANVAS_HEIGHT as i32 - photo_height as i32 - PHOTO_BOTTOM_MARGIN as i32;

    let text_x = (CANVAS_WIDTH as i32 - text.width as i32) / 2;
    let text_y = CANVAS_HEIGHT as i32 - text.height as i32 - TEXT_BOTTOM_MARGIN as i32;

    Placement {
        photo_x,
        photo_y,
        photo_width,
        photo_height,
        text_x,
        text_y,
        fill,
        outline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: u32, height: u32) -> TextMetrics {
        TextMetrics { width, height, x_offset: 0, y_offset: 0 }
    }

    #[test]
    fn photo_fits_within_max_edge() {
        assert_eq!(fit_photo(1400, 700), (700, 350));
        assert_eq!(fit_photo(700, 1400), (350, 700));
        assert_eq!(fit_photo(2100, 2100), (700, 700));
    }

    #[test]
    fn small_photos_are_not_upscaled() {
        assert_eq!(fit_photo(300, 200), (300, 200));
        assert_eq!(fit_photo(700, 700), (700, 700));
    }

    #[test]
    fn photo_is_centered_with_bottom_margin() {
        let p = layout(400, 500, &metrics(100, 30), "white");
        assert_eq!(p.photo_x, 100);
        assert_eq!(p.photo_y, 900 - 500 - 200);
    }

    #[test]
    fn oversized_photo_gets_negative_x() {
        let p = layout(700, 350, &metrics(100, 30), "white");
        assert_eq!(p.photo_x, -50);
    }

    #[test]
    fn text_is_centered_above_bottom_margin() {
        let p = layout(100, 100, &metrics(200, 50), "white");
        assert_eq!(p.text_x, 200);
        assert_eq!(p.text_y, 900 - 50 - 40);
    }

    #[test]
    fn colors_follow_background() {
        let on_black = layout(10, 10, &metrics(10, 10), "black");
        assert_eq!(on_black.fill, Rgb([255, 255, 255]));
        assert_eq!(on_black.outline, Rgb([0, 0, 0]));

        let on_yellow = layout(10, 10, &metrics(10, 10), "Yellow");
        assert_eq!(on_yellow.fill, Rgb([0, 0, 0]));
        assert_eq!(on_yellow.outline, Rgb([255, 255, 255]));
    }
}
