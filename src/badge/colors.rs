//! Category → background color table and color parsing.
//!
//! The table is seeded once at startup and never mutated; lookups are total
//! and unknown categories fall back to white.

use std::collections::HashMap;

use image::Rgb;
use once_cell::sync::Lazy;

pub const DEFAULT_BACKGROUND: &str = "white";

static CATEGORY_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("AX7", "Yellow"),
        ("Deftones", "Yellow"),
        ("Korn", "Yellow"),
        ("LNT", "White"),
        ("System of a Down Crew", "black"),
        ("Polyphia", "white"),
        ("Wisp", "white"),
        ("Locals", "lightblue"),
    ])
});

/// Background color name for a category. Never fails: unknown categories get
/// [`DEFAULT_BACKGROUND`].
pub fn background_for(category: &str) -> &'static str {
    CATEGORY_COLORS
        .get(category)
        .copied()
        .unwrap_or(DEFAULT_BACKGROUND)
}

/// Resolve a color name (or `#rrggbb` literal) to RGB. Unknown names paint
/// white rather than erroring, matching the category table's fallback.
pub fn parse_color(name: &str) -> Rgb<u8> {
    let name = name.trim();
    if let Some(hex_part) = name.strip_prefix('#') {
        if hex_part.len() == 6 {
            if let Ok(b) = hex::decode(hex_part) {
                return Rgb([b[0], b[1], b[2]]);
            }
        }
        return Rgb([255, 255, 255]);
    }
    match name.to_ascii_lowercase().as_str() {
        "white" => Rgb([255, 255, 255]),
        "black" => Rgb([0, 0, 0]),
        "yellow" => Rgb([255, 255, 0]),
        "lightblue" => Rgb([173, 216, 230]),
        "red" => Rgb([255, 0, 0]),
        "green" => Rgb([0, 128, 0]),
        "blue" => Rgb([0, 0, 255]),
        "gray" | "grey" => Rgb([128, 128, 128]),
        _ => Rgb([255, 255, 255]),
    }
}

/// Text fill and outline colors for a background name.
///
/// Black backgrounds get white text with a black outline; every other
/// background gets black text with a white outline. This is the only contrast
/// rule the product applies.
pub fn contrast_colors(background: &str) -> (Rgb<u8>, Rgb<u8>) {
    if background.eq_ignore_ascii_case("black") {
        (Rgb([255, 255, 255]), Rgb([0, 0, 0]))
    } else {
        (Rgb([0, 0, 0]), Rgb([255, 255, 255]))
    }
}
