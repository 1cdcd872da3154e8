use badgegen::badge::layout::{CANVAS_HEIGHT, CANVAS_WIDTH};
use badgegen::{render_badge_with, BadgeError, BadgeRequest, FontResolver};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

/// A resolver whose chain is empty, so rendering always uses the built-in
/// bitmap font and behaves identically on every host.
fn builtin_resolver() -> FontResolver {
    FontResolver::with_candidates(Vec::new())
}

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    let enc = PngEncoder::new(&mut buf);
    enc.write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .expect("png fixture should encode");
    buf
}

fn solid_foreground(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    png_bytes(&RgbaImage::from_pixel(w, h, Rgba(rgba)))
}

fn assert_near(actual: [u8; 3], expected: [u8; 3], tol: u8, context: &str) {
    for i in 0..3 {
        let diff = actual[i].abs_diff(expected[i]);
        assert!(diff <= tol, "{context}: channel {i} {actual:?} vs {expected:?}");
    }
}

#[test]
fn ax7_badge_is_yellow_and_centered() {
    let req = BadgeRequest::new(solid_foreground(100, 100, [40, 40, 200, 255]), "Alice", "AX7");
    let (jpeg, diag) = render_badge_with(&builtin_resolver(), &req).expect("render should succeed");

    assert_eq!(diag.background, "Yellow");
    assert!(!diag.font_scalable);

    // Builtin font at size 75: upscale 9, five 8px cells -> 360x72 box at
    // x = (600 - 360) / 2.
    assert_eq!(diag.text.width, 360);
    assert_eq!(diag.text.height, 72);
    assert_eq!(diag.text_x, 120);

    let decoded = image::load_from_memory(&jpeg).expect("output should decode").to_rgb8();
    assert_eq!(decoded.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    // Corner untouched by photo and text: category background shows through.
    assert_near(decoded.get_pixel(5, 5).0, [255, 255, 0], 8, "background corner");

    // The drawn ink itself is centered: dark fill pixels on a mid-text row
    // leave equal margins either side, within one glyph column.
    let row = (diag.text_y + diag.text.height as i32 / 2) as u32;
    let dark: Vec<u32> = (0..CANVAS_WIDTH)
        .filter(|&x| decoded.get_pixel(x, row).0.iter().all(|&c| c < 100))
        .collect();
    let (first, last) = (*dark.first().expect("ink on text row"), *dark.last().unwrap());
    let left_margin = first as i32;
    let right_margin = CANVAS_WIDTH as i32 - 1 - last as i32;
    assert!((left_margin - right_margin).abs() <= 9, "ink off-center: {first}..{last}");
}

#[test]
fn unknown_category_gets_white_background_and_black_text() {
    let req = BadgeRequest::new(solid_foreground(50, 50, [0, 0, 0, 255]), "Bob", "Unknown Band");
    let (jpeg, diag) = render_badge_with(&builtin_resolver(), &req).expect("render should succeed");

    assert_eq!(diag.background, "white");
    let decoded = image::load_from_memory(&jpeg).expect("output should decode").to_rgb8();
    assert_near(decoded.get_pixel(5, 5).0, [255, 255, 255], 6, "background corner");

    // Sample inside the text ink box: black fill on white background.
    let tx = (diag.text_x + diag.text.width as i32 / 2).clamp(0, CANVAS_WIDTH as i32 - 1) as u32;
    let ty = (diag.text_y + diag.text.height as i32 / 2).clamp(0, CANVAS_HEIGHT as i32 - 1) as u32;
    let row_has_dark = (0..CANVAS_WIDTH)
        .any(|x| decoded.get_pixel(x, ty).0.iter().all(|&c| c < 100));
    assert!(row_has_dark, "no dark text ink found on row {ty} (sampled at {tx})");
}

#[test]
fn fully_transparent_foreground_leaves_background_intact() {
    let fg = solid_foreground(200, 200, [255, 0, 0, 0]);
    let req = BadgeRequest::new(fg, "Alice", "Unknown Band");
    let (jpeg, diag) = render_badge_with(&builtin_resolver(), &req).expect("render should succeed");

    let decoded = image::load_from_memory(&jpeg).expect("output should decode").to_rgb8();
    // Center of where the photo was placed: still the white background.
    let cx = (diag.photo_x + diag.photo_width as i32 / 2) as u32;
    let cy = (diag.photo_y + diag.photo_height as i32 / 2) as u32;
    assert_near(decoded.get_pixel(cx, cy).0, [255, 255, 255], 6, "photo center");
}

#[test]
fn oversized_photo_is_capped_to_max_edge() {
    let req = BadgeRequest::new(solid_foreground(1400, 700, [10, 200, 10, 255]), "Alice", "AX7");
    let (_, diag) = render_badge_with(&builtin_resolver(), &req).expect("render should succeed");
    assert_eq!((diag.photo_width, diag.photo_height), (700, 350));
    assert_eq!(diag.photo_x, -50);
}

#[test]
fn rendering_twice_is_byte_identical() {
    let req = BadgeRequest::new(solid_foreground(64, 64, [1, 2, 3, 128]), "Alice", "Korn")
        .with_font_size(60);
    let resolver = builtin_resolver();
    let (a, _) = render_badge_with(&resolver, &req).expect("first render");
    let (b, _) = render_badge_with(&resolver, &req).expect("second render");
    assert_eq!(a, b);
}

#[test]
fn output_carries_300_dpi_jfif_density() {
    let req = BadgeRequest::new(solid_foreground(10, 10, [0, 0, 0, 255]), "A", "LNT");
    let (jpeg, _) = render_badge_with(&builtin_resolver(), &req).expect("render should succeed");
    assert_eq!(&jpeg[6..11], b"JFIF\0");
    assert_eq!(jpeg[13], 1);
    assert_eq!(u16::from_be_bytes([jpeg[14], jpeg[15]]), 300);
    assert_eq!(u16::from_be_bytes([jpeg[16], jpeg[17]]), 300);
}

#[test]
fn corrupt_foreground_is_an_explicit_error() {
    let req = BadgeRequest::new(vec![0xDE, 0xAD, 0xBE, 0xEF], "Alice", "AX7");
    let err = render_badge_with(&builtin_resolver(), &req).expect_err("corrupt input must fail");
    assert!(matches!(err, BadgeError::ForegroundDecode(_)));
}
