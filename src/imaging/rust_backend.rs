//! Statically linked image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe | `ImageReader::with_guessed_format` + `into_dimensions` |
//! | Decode (JPEG, PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `jpeg_encoder::Encoder`, baseline or progressive |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, compression level mapped to fast/default/best |
//! | Encode → WebP | `webp::Encoder`, lossy at the configured quality |
//!
//! PNG is lossless, so its quality setting has no effect here.

use super::backend::{BackendError, Dimensions, ImageBackend, Probe};
use super::params::{EncodeParams, ResizeParams};
use crate::types::Format;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Backend built on the `image` crate, `jpeg-encoder` and `webp`.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn map_format(format: ImageFormat) -> Format {
    match format {
        ImageFormat::Jpeg => Format::Jpeg,
        ImageFormat::Png => Format::Png,
        ImageFormat::WebP => Format::WebP,
        ImageFormat::Gif => Format::Gif,
        ImageFormat::Tiff => Format::Tiff,
        ImageFormat::Bmp => Format::Bmp,
        ImageFormat::Avif => Format::Avif,
        _ => Format::Other,
    }
}

/// Formats with a decoder compiled in.
fn decodable(format: Format) -> bool {
    matches!(format, Format::Jpeg | Format::Png | Format::WebP)
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Map a 0-9 compression level onto the encoder's three presets.
fn png_compression(level: u8) -> CompressionType {
    match level {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

fn encode_failed(format: Format, reason: impl std::fmt::Display) -> BackendError {
    BackendError::ProcessingFailed(format!("{} encode failed: {}", format, reason))
}

/// Encode a DynamicImage to an in-memory buffer.
fn encode_image(img: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
    match *params {
        EncodeParams::Jpeg {
            quality,
            progressive,
        } => encode_jpeg(img, quality.value() as u8, progressive),
        EncodeParams::Png {
            compression_level, ..
        } => {
            let mut buf = Vec::new();
            let encoder = PngEncoder::new_with_quality(
                &mut buf,
                png_compression(compression_level),
                PngFilter::Adaptive,
            );
            img.write_with_encoder(encoder)
                .map_err(|e| encode_failed(Format::Png, e))?;
            Ok(buf)
        }
        EncodeParams::WebP { quality } => encode_webp(img, quality.value() as f32),
    }
}

fn encode_jpeg(
    img: &DynamicImage,
    quality: u8,
    progressive: bool,
) -> Result<Vec<u8>, BackendError> {
    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let too_large = |_: std::num::TryFromIntError| encode_failed(Format::Jpeg, "dimensions exceed 65535");
    let width = u16::try_from(rgb.width()).map_err(too_large)?;
    let height = u16::try_from(rgb.height()).map_err(too_large)?;

    let mut buf = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut buf, quality);
    encoder.set_progressive(progressive);
    encoder
        .encode(rgb.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| encode_failed(Format::Jpeg, e))?;
    Ok(buf)
}

fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, BackendError> {
    let (width, height) = (img.width(), img.height());
    let memory = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
    }
    .map_err(|e| encode_failed(Format::WebP, format!("{:?}", e)))?;
    Ok(memory.to_vec())
}

impl ImageBackend for RustBackend {
    fn probe(&self, path: &Path) -> Result<Probe, BackendError> {
        let reader = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?;
        let format = reader.format().map(map_format).unwrap_or(Format::Other);

        // No decoder for these; the planner rejects them before dimensions matter.
        if !decodable(format) {
            return Ok(Probe {
                format,
                dimensions: Dimensions {
                    width: 0,
                    height: 0,
                },
            });
        }

        let (width, height) = reader.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Probe {
            format,
            dimensions: Dimensions { width, height },
        })
    }

    fn resize(&self, params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        encode_image(&resized, &params.encode)
    }
}
