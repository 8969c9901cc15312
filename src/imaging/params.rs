//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the planner (which decides what derivatives to create)
//! and the [`backend`](super::backend) (which does the actual pixel work).
//! This separation allows swapping backends (e.g. for testing with a mock)
//! without changing planning logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1-100, default 80). Clamped on construction.
//! - [`EncodeParams`]: Output format plus that format's encoder settings.
//! - [`ResizeParams`]: Full specification for one derivative: source, target dimensions, encoding.

use crate::types::Format;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Output format and its encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeParams {
    Jpeg {
        quality: Quality,
        progressive: bool,
    },
    Png {
        quality: Quality,
        /// zlib-style level, 0 (fastest) to 9 (smallest).
        compression_level: u8,
    },
    WebP {
        quality: Quality,
    },
}

impl EncodeParams {
    pub fn format(&self) -> Format {
        match self {
            EncodeParams::Jpeg { .. } => Format::Jpeg,
            EncodeParams::Png { .. } => Format::Png,
            EncodeParams::WebP { .. } => Format::WebP,
        }
    }

    pub fn quality(&self) -> Quality {
        match *self {
            EncodeParams::Jpeg { quality, .. }
            | EncodeParams::Png { quality, .. }
            | EncodeParams::WebP { quality } => quality,
        }
    }
}

/// Parameters for a resize + encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub encode: EncodeParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_80() {
        assert_eq!(Quality::default().value(), 80);
    }

    #[test]
    fn encode_params_report_format_and_quality() {
        let jpeg = EncodeParams::Jpeg {
            quality: Quality::new(70),
            progressive: true,
        };
        assert_eq!(jpeg.format(), Format::Jpeg);
        assert_eq!(jpeg.quality().value(), 70);

        let webp = EncodeParams::WebP {
            quality: Quality::new(85),
        };
        assert_eq!(webp.format(), Format::WebP);
        assert_eq!(webp.quality().value(), 85);
    }
}
