//! Font resolution with an ordered fallback chain.
//!
//! Candidates are tried in order: the bundled asset first (so output is
//! reproducible across hosts), then well-known system font paths, and finally
//! the built-in fixed-size bitmap renderer, which always succeeds. A candidate
//! that is missing or unparsable is skipped with a warning; no font failure
//! ever escapes this module.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::Font;
use tracing::{debug, warn};

/// Bundled font shipped with the application assets.
pub const BUNDLED_FONT: &str = "DejaVuSans.ttf";

const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Parsed fonts keyed by path. Populated once per path for the process
/// lifetime; the underlying assets are static, so entries are never evicted.
static FONT_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSourceKind {
    /// Version-controlled asset shipped with the application.
    Bundled,
    /// Host operating system font path; portability safety net only.
    System,
}

#[derive(Clone, Debug)]
pub struct FontCandidate {
    pub kind: FontSourceKind,
    pub path: PathBuf,
}

/// A font the resolver settled on for one render.
#[derive(Clone)]
pub enum Face {
    /// Outline font; glyphs rasterize accurately at any size.
    Scalable(Arc<Font<'static>>),
    /// Built-in 8×8 bitmap renderer; native size only.
    Fixed,
}

#[derive(Clone)]
pub struct ResolvedFont {
    pub face: Face,
    /// Which candidate succeeded, for diagnostics.
    pub source: String,
    /// Size passed through to measurement and drawing, in pixels.
    pub size: f32,
}

impl ResolvedFont {
    pub fn is_scalable(&self) -> bool {
        matches!(self.face, Face::Scalable(_))
    }
}

/// Ordered candidate list. Construction is cheap; the parsed fonts behind it
/// are shared process-wide.
#[derive(Clone, Debug)]
pub struct FontResolver {
    candidates: Vec<FontCandidate>,
}

impl Default for FontResolver {
    fn default() -> Self {
        let mut candidates = vec![FontCandidate {
            kind: FontSourceKind::Bundled,
            path: fonts_dir().join(BUNDLED_FONT),
        }];
        candidates.extend(SYSTEM_FONT_PATHS.iter().map(|p| FontCandidate {
            kind: FontSourceKind::System,
            path: PathBuf::from(p),
        }));
        Self { candidates }
    }
}

impl FontResolver {
    /// Resolver with an explicit chain; an empty chain degrades straight to
    /// the built-in renderer.
    pub fn with_candidates(candidates: Vec<FontCandidate>) -> Self {
        Self { candidates }
    }

    /// Resolve a font for the requested pixel size. Never fails: every
    /// candidate may be skipped, in which case the fixed-size built-in
    /// renderer is returned.
    pub fn resolve(&self, size: f32) -> ResolvedFont {
        for candidate in &self.candidates {
            match load_font_cached(&candidate.path) {
                Ok(font) => {
                    let kind = candidate.kind;
                    debug!(path = %candidate.path.display(), ?kind, "font candidate loaded");
                    return ResolvedFont {
                        face: Face::Scalable(font),
                        source: candidate.path.display().to_string(),
                        size,
                    };
                }
                Err(reason) => {
                    warn!(path = %candidate.path.display(), %reason, "font candidate skipped");
                }
            }
        }
        warn!("all font candidates failed; using built-in fixed-size font");
        ResolvedFont {
            face: Face::Fixed,
            source: "builtin".to_string(),
            size,
        }
    }
}

fn load_font_cached(path: &Path) -> Result<Arc<Font<'static>>, String> {
    if let Some(f) = FONT_CACHE.lock().get(path) {
        return Ok(Arc::clone(f));
    }

    let bytes = std::fs::read(path).map_err(|e| format!("read failed: {e}"))?;
    let font = Font::try_from_vec(bytes).ok_or_else(|| "parse failed".to_string())?;

    let font = Arc::new(font);
    FONT_CACHE.lock().insert(path.to_path_buf(), Arc::clone(&font));
    Ok(font)
}

/// Asset directory holding bundled fonts, resolved the same way the rest of
/// the application resolves asset paths: `PROJECT_ROOT` when set, otherwise
/// relative to the crate manifest.
fn fonts_dir() -> PathBuf {
    let project_root = std::env::var("PROJECT_ROOT").ok().unwrap_or_else(|| {
        Path::new(env!("CARGO_MANIFEST_DIR")).to_string_lossy().to_string()
    });
    PathBuf::from(project_root).join("assets").join("fonts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("badgegen-test-{name}-{nanos}"))
    }

    #[test]
    fn empty_chain_degrades_to_builtin() {
        let resolver = FontResolver::with_candidates(Vec::new());
        let font = resolver.resolve(75.0);
        assert!(!font.is_scalable());
        assert_eq!(font.source, "builtin");
        assert_eq!(font.size, 75.0);
    }

    #[test]
    fn missing_and_malformed_candidates_are_skipped() {
        let junk = temp_path("junk.ttf");
        fs::write(&junk, b"definitely not a font").expect("junk file should write");

        let resolver = FontResolver::with_candidates(vec![
            FontCandidate {
                kind: FontSourceKind::Bundled,
                path: temp_path("missing.ttf"),
            },
            FontCandidate {
                kind: FontSourceKind::System,
                path: junk.clone(),
            },
        ]);
        let font = resolver.resolve(32.0);
        assert!(!font.is_scalable());
        assert_eq!(font.source, "builtin");

        let _ = fs::remove_file(junk);
    }

    #[test]
    fn default_chain_tries_bundled_asset_first() {
        let resolver = FontResolver::default();
        let first = &resolver.candidates[0];
        assert_eq!(first.kind, FontSourceKind::Bundled);
        assert!(first.path.ends_with(Path::new("assets/fonts").join(BUNDLED_FONT)));
        assert!(resolver.candidates[1..]
            .iter()
            .all(|c| c.kind == FontSourceKind::System));
    }

    #[test]
    fn resolve_never_fails_for_any_size() {
        let resolver = FontResolver::default();
        for size in [1.0_f32, 12.0, 75.0, 400.0] {
            let font = resolver.resolve(size);
            assert_eq!(font.size, size);
        }
    }
}
