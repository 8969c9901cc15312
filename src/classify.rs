//! Foreground/background classification.
//!
//! A source is a background image when its path mentions one of the
//! [`BACKGROUND_TOKENS`]. Background sources are rewritten as CSS
//! `image-set()` declarations; everything else becomes a `<picture>`.
//!
//! The test runs on the whole path text, directories included, so
//! `img/backgrounds/forest.jpg` and `img/hero.png` both classify as background.
//! Matching ignores ASCII case. There is no per-file override.

use crate::types::Classification;
use std::path::Path;

/// Path fragments that mark a source as a background image.
pub const BACKGROUND_TOKENS: &[&str] = &["background", "bg-", "hero"];

pub fn classify(path: &Path) -> Classification {
    let text = path.to_string_lossy().to_ascii_lowercase();
    if BACKGROUND_TOKENS.iter().any(|token| text.contains(token)) {
        Classification::Background
    } else {
        Classification::Foreground
    }
}
