//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: probe and resize. Resize returns the encoded bytes; writing them
//! to disk is the generator's job, so filesystem behavior (temp file, delete,
//! rename) is the same for every backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate with dedicated JPEG and WebP encoders.

use super::params::ResizeParams;
use crate::types::Format;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(Format),
}

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Result of a probe: the detected container format and its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub format: Format,
    pub dimensions: Dimensions,
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can be shared by every worker in the pool.
pub trait ImageBackend: Sync {
    /// Detect format and dimensions without a full decode where possible.
    fn probe(&self, path: &Path) -> Result<Probe, BackendError>;

    /// Decode `params.source`, resize to exactly `width`×`height`, and return
    /// the bytes encoded per `params.encode`.
    fn resize(&self, params: &ResizeParams) -> Result<Vec<u8>, BackendError>;
}
