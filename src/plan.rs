//! Variant planning: which derivatives a source needs.
//!
//! Pure functions, no I/O beyond the probe. For a JPEG or PNG source the plan
//! is the full cross-product of size tiers × `[webp, <source format>]`, in tier
//! order with WebP first inside each tier:
//!
//! ```text
//! sunset.jpg (4000x3000)
//!   small   480x360   sunset-small.webp   sunset-small.jpg
//!   medium  768x576   sunset-medium.webp  sunset-medium.jpg
//!   large   1280x960  sunset-large.webp   sunset-large.jpg
//!   xl      1920x1440 sunset-xl.webp      sunset-xl.jpg
//! ```
//!
//! Tier widths are applied as-is. A 500px source still gets a 1920px `xl`.

use crate::classify::classify;
use crate::config::EncodeOptions;
use crate::imaging::{BackendError, EncodeParams, ImageBackend, ResizeParams, scaled_height};
use crate::naming;
use crate::types::{Derivative, Format, SizeProfile, SourceImage, Tier};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("{path}: unsupported format {format}")]
    UnsupportedFormat { path: PathBuf, format: Format },
    #[error("{0}: no file name to derive from")]
    InvalidPath(PathBuf),
}

/// One derivative to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDerivative {
    pub tier: Tier,
    pub width: u32,
    pub height: u32,
    pub path: PathBuf,
    pub encode: EncodeParams,
}

impl PlannedDerivative {
    pub fn format(&self) -> Format {
        self.encode.format()
    }

    pub fn resize_params(&self, source: &Path) -> ResizeParams {
        ResizeParams {
            source: source.to_path_buf(),
            width: self.width,
            height: self.height,
            encode: self.encode,
        }
    }

    /// The record entry for this derivative once it has been written.
    pub fn to_derivative(&self) -> Derivative {
        Derivative {
            tier: self.tier,
            format: self.format(),
            path: self.path.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Every derivative of one source, in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantPlan {
    pub source: SourceImage,
    pub derivatives: Vec<PlannedDerivative>,
}

/// Output formats for a source format: next-gen first, then the raster fallback.
///
/// `None` for anything that is not JPEG or PNG.
pub fn target_formats(source: Format) -> Option<[Format; 2]> {
    match source {
        Format::Jpeg | Format::Png => Some([Format::WebP, source]),
        _ => None,
    }
}

/// Plan the derivatives for a probed source.
pub fn plan_variants(
    source: &SourceImage,
    profiles: &[SizeProfile],
    encode: &EncodeOptions,
) -> Result<VariantPlan, PlanError> {
    let formats = target_formats(source.format).ok_or_else(|| PlanError::UnsupportedFormat {
        path: source.path.clone(),
        format: source.format,
    })?;

    let mut derivatives = Vec::with_capacity(profiles.len() * formats.len());
    for profile in profiles {
        let height = scaled_height((source.width, source.height), profile.width);
        for format in formats {
            let encode = encode
                .params_for(format)
                .ok_or_else(|| PlanError::UnsupportedFormat {
                    path: source.path.clone(),
                    format,
                })?;
            let path = naming::derivative_path(&source.path, profile.tier, format)
                .ok_or_else(|| PlanError::InvalidPath(source.path.clone()))?;
            derivatives.push(PlannedDerivative {
                tier: profile.tier,
                width: profile.width,
                height,
                path,
                encode,
            });
        }
    }

    Ok(VariantPlan {
        source: source.clone(),
        derivatives,
    })
}

/// Probe a discovered path into a [`SourceImage`].
pub fn probe_source(backend: &impl ImageBackend, path: &Path) -> Result<SourceImage, BackendError> {
    let probe = backend.probe(path)?;
    Ok(SourceImage {
        path: path.to_path_buf(),
        format: probe.format,
        width: probe.dimensions.width,
        height: probe.dimensions.height,
        classification: classify(path),
    })
}
