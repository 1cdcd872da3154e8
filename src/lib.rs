//! badgegen — personalized identity badge rendering.
//!
//! Turns a background-removed photo, a display name, and a category into a
//! 600×900 badge JPEG (2×3 inches at 300 DPI). The category picks the
//! background color; the photo is composited centered with alpha honored; the
//! name is drawn near the bottom with an outline stroke, using the first font
//! that loads from a bundled-then-system fallback chain (degrading to a
//! built-in bitmap font when none does).
//!
//! [`badge::render_badge`] is the core entry point; [`service::create_badge`]
//! chains the external background-removal call in front of it. Web routing,
//! upload validation, and file serving are left to the embedding application.

pub mod badge;
pub mod perf;
pub mod remove_bg;
pub mod service;

pub use badge::font::FontResolver;
pub use badge::{
    render_badge, render_badge_with, BadgeError, BadgeRequest, RenderDiagnostics,
    DEFAULT_FONT_SIZE,
};
