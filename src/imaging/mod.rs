//! Image processing, statically linked, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** | `image::ImageReader` format sniffing + header dimensions |
//! | **Resize** | Lanczos3 `resize_exact` |
//! | **Encode** | `jpeg-encoder` JPEG, `image` PNG, `webp` lossy WebP, into memory |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, Probe};
pub use calculations::scaled_height;
pub use params::{EncodeParams, Quality, ResizeParams};
pub use rust_backend::RustBackend;
