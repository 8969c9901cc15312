//! Shared types used across all pipeline stages.
//!
//! A build flows through these types in one direction:
//!
//! ```text
//! SourceImage ──plan──▶ PlannedDerivative ──encode──▶ Derivative ──▶ AssetRecord
//! ```
//!
//! Everything here is created fresh per build invocation. Nothing is persisted
//! between builds; the optional JSON manifest written by the CLI is output only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Raster formats the pipeline knows how to name.
///
/// Only [`Format::Jpeg`] and [`Format::Png`] are accepted as sources; the rest
/// exist so the probe can report what it actually found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Jpeg,
    Png,
    WebP,
    Gif,
    Tiff,
    Bmp,
    Avif,
    Other,
}

impl Format {
    /// File extension used for derivatives written in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Jpeg => "jpg",
            Format::Png => "png",
            Format::WebP => "webp",
            Format::Gif => "gif",
            Format::Tiff => "tiff",
            Format::Bmp => "bmp",
            Format::Avif => "avif",
            Format::Other => "bin",
        }
    }

    /// MIME type, as used in `<source type>` and CSS `type()` hints.
    pub fn mime(self) -> &'static str {
        match self {
            Format::Jpeg => "image/jpeg",
            Format::Png => "image/png",
            Format::WebP => "image/webp",
            Format::Gif => "image/gif",
            Format::Tiff => "image/tiff",
            Format::Bmp => "image/bmp",
            Format::Avif => "image/avif",
            Format::Other => "application/octet-stream",
        }
    }

    /// Short lowercase name for log lines.
    pub fn name(self) -> &'static str {
        match self {
            Format::Jpeg => "jpeg",
            Format::Png => "png",
            Format::WebP => "webp",
            Format::Gif => "gif",
            Format::Tiff => "tiff",
            Format::Bmp => "bmp",
            Format::Avif => "avif",
            Format::Other => "unknown",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which rewrite path a source takes: `<picture>` or CSS `image-set()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Foreground,
    Background,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Foreground => f.write_str("foreground"),
            Classification::Background => f.write_str("background"),
        }
    }
}

/// Named width tier. The set is fixed; only the widths are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Small,
    Medium,
    Large,
    Xl,
}

impl Tier {
    /// All tiers in ascending width order.
    pub const ALL: [Tier; 4] = [Tier::Small, Tier::Medium, Tier::Large, Tier::Xl];

    /// Name used in derivative filenames (`sunset-medium.jpg`).
    pub fn name(self) -> &'static str {
        match self {
            Tier::Small => "small",
            Tier::Medium => "medium",
            Tier::Large => "large",
            Tier::Xl => "xl",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tier bound to its configured target width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeProfile {
    pub tier: Tier,
    pub width: u32,
}

/// A discovered source image after probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
    pub format: Format,
    pub width: u32,
    pub height: u32,
    pub classification: Classification,
}

/// One generated file: a source at one tier in one output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivative {
    pub tier: Tier,
    pub format: Format,
    pub path: PathBuf,
    /// Encoded output width (the tier width).
    pub width: u32,
    /// Encoded output height, aspect-preserving.
    pub height: u32,
}

impl Derivative {
    /// Bare file name, e.g. `sunset-small.webp`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Every derivative of one source plus the source's own metadata.
///
/// Only constructed once all planned derivatives were written, so a record
/// is always complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Original source path exactly as discovery produced it. Registry key and
    /// the literal text the rewriter searches for.
    pub source_path: String,
    /// Directory holding both the source and its derivatives.
    pub directory: PathBuf,
    /// Source file stem (`sunset` for `photos/sunset.jpg`).
    pub base_name: String,
    pub format: Format,
    pub width: u32,
    pub height: u32,
    pub classification: Classification,
    pub derivatives: Vec<Derivative>,
}

impl AssetRecord {
    /// Build a record from a probed source and its written derivatives.
    pub fn new(source: &SourceImage, derivatives: Vec<Derivative>) -> Self {
        let directory = source
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let base_name = crate::naming::base_name(&source.path).unwrap_or_default();
        Self {
            source_path: source.path.to_string_lossy().into_owned(),
            directory,
            base_name,
            format: source.format,
            width: source.width,
            height: source.height,
            classification: source.classification,
            derivatives,
        }
    }

    /// Look up the derivative for a tier/format pair.
    pub fn derivative(&self, tier: Tier, format: Format) -> Option<&Derivative> {
        self.derivatives
            .iter()
            .find(|d| d.tier == tier && d.format == format)
    }

    /// All derivatives in one format, in tier order.
    pub fn in_format(&self, format: Format) -> impl Iterator<Item = &Derivative> {
        self.derivatives.iter().filter(move |d| d.format == format)
    }

    /// The raster fallback format (same as the source format).
    pub fn fallback_format(&self) -> Format {
        self.format
    }
}
