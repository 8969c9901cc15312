//! # respimg
//!
//! A build-time responsive image pipeline for static sites. Source JPEG and
//! PNG files are resized into a fixed set of width tiers, each in WebP plus the
//! source's own format, and the rendered HTML and CSS are rewritten to point at
//! them.
//!
//! # Architecture: Two Phases Around Rendering
//!
//! ```text
//! before render   discover → plan → generate → registry (frozen)
//! after render    every document → rewrite against the registry
//! ```
//!
//! The phases are separated by an explicit barrier: the registry is published
//! once, after every worker has finished, and the rewrite phase only reads it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discover`] | Recursive glob discovery of source images under the source and theme roots |
//! | [`classify`] | Foreground/background heuristic on the source path |
//! | [`plan`] | Probed source → exact (tier, format) derivative set |
//! | [`process`] | Runs plans through the codec on a bounded worker pool; per-image failure isolation |
//! | [`registry`] | Build-scoped two-bucket store of generated assets, keyed by source path |
//! | [`rewrite`] | `<picture>` and CSS `image-set()` substitution, support stylesheet |
//! | [`pipeline`] | Pre-render/post-render lifecycle, host hooks, the completion barrier |
//! | [`config`] | `respimg.toml` loading, per-group override merging, validation |
//! | [`types`] | Shared types: formats, tiers, sources, derivatives, records |
//! | [`naming`] | Deterministic `<base>-<tier>.<ext>` derivative names |
//! | [`imaging`] | Codec seam and the statically linked encoder backend |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Text Substitution, Not a DOM
//!
//! Rendered output is rewritten with literal and anchored-regex matches on the
//! registered source paths. There is no HTML or CSS parser: a page that writes
//! its `<img>` tag or `background-image` declaration differently from the
//! expected shape is simply left alone.
//!
//! ## Always Regenerate
//!
//! Every build writes every derivative again. There is no cache to go stale
//! and no manifest to keep in sync; a derivative on disk is always the product
//! of the current source and the current settings.
//!
//! ## Self-Contained Imaging
//!
//! The [`imaging`] module decodes and resamples with the `image` crate
//! (Lanczos3), writes JPEG with `jpeg-encoder` and lossy WebP with `webp`,
//! whose libwebp is compiled in. No system libraries are needed at runtime.

pub mod classify;
pub mod config;
pub mod discover;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod process;
pub mod registry;
pub mod rewrite;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
