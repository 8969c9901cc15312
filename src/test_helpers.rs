//! Shared test utilities.
//!
//! Synthetic images for backend and generator tests, and ready-made
//! [`AssetRecord`]s for registry and rewriter tests.

use crate::classify::classify;
use crate::config::PipelineConfig;
use crate::plan::plan_variants;
use crate::types::{AssetRecord, Classification, Format, SourceImage};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a gradient JPEG of the given size. Parent directories are created.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    write_image(path, |p| img.save_with_format(p, ImageFormat::Jpeg));
}

/// Write a PNG with an alpha gradient. Parent directories are created.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([64, (x % 256) as u8, (y % 256) as u8, 200])
    });
    write_image(path, |p| img.save_with_format(p, ImageFormat::Png));
}

fn write_image(path: &Path, save: impl FnOnce(&Path) -> image::ImageResult<()>) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    save(path).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}

// =========================================================================
// Records
// =========================================================================

/// A complete record (default tiers, 8 derivatives) for a 4000x3000 source.
///
/// The format follows the extension: `.png` is PNG, anything else JPEG.
pub fn sample_record(source_path: &str, classification: Classification) -> AssetRecord {
    let path = PathBuf::from(source_path);
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => Format::Png,
        _ => Format::Jpeg,
    };
    let source = SourceImage {
        path,
        format,
        width: 4000,
        height: 3000,
        classification,
    };
    let config = PipelineConfig::default();
    let plan = plan_variants(&source, &config.profiles(), &config.encode_options())
        .unwrap_or_else(|e| panic!("cannot plan sample record: {e}"));
    let derivatives = plan.derivatives.iter().map(|d| d.to_derivative()).collect();
    AssetRecord::new(&source, derivatives)
}

/// [`sample_record`] with the classification the path implies.
pub fn classified_record(source_path: &str) -> AssetRecord {
    sample_record(source_path, classify(Path::new(source_path)))
}
