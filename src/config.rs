//! Pipeline configuration.
//!
//! Configuration is resolved once per build: stock defaults, then the host's
//! overrides merged on top **one level deep per group**. A partial `[jpeg]`
//! override replaces only the keys it names; sibling keys keep their defaults.
//!
//! ## Config File
//!
//! The CLI reads `respimg.toml` from the working directory (or `--config`):
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! quality = 80              # Default quality; also the WebP quality unless [webp] sets one
//!
//! [jpeg]
//! quality = 80
//! progressive = true
//!
//! [png]
//! quality = 80
//! compression_level = 9     # 0 (fastest) - 9 (smallest)
//!
//! [webp]
//! # quality = 80            # Defaults to the top-level quality
//!
//! [background_images]
//! enabled = true            # CSS image-set() rewriting + support stylesheet
//! inject_styles = true      # Support <style> block before </head>
//! selector = ".responsive-bg"
//! class = "responsive-picture"
//!
//! [sizes]
//! small = 480
//! medium = 768
//! large = 1280
//! xl = 1920
//!
//! [paths]
//! base_dir = "source"       # Derivative URLs are computed relative to this
//! url_prefix = "/"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{EncodeParams, Quality};
use crate::types::{Format, SizeProfile, Tier};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name the CLI looks for when no `--config` is given.
pub const CONFIG_FILENAME: &str = "respimg.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Fully-resolved pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Default encode quality (1-100). WebP falls back to it.
    pub quality: u32,
    pub jpeg: JpegOptions,
    pub png: PngOptions,
    pub webp: WebpOptions,
    pub background_images: BackgroundImagesConfig,
    pub sizes: SizesConfig,
    pub paths: PathsConfig,
    pub processing: ProcessingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quality: 80,
            jpeg: JpegOptions::default(),
            png: PngOptions::default(),
            webp: WebpOptions::default(),
            background_images: BackgroundImagesConfig::default(),
            sizes: SizesConfig::default(),
            paths: PathsConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JpegOptions {
    pub quality: u32,
    pub progressive: bool,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            progressive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PngOptions {
    pub quality: u32,
    #[serde(alias = "compressionLevel")]
    pub compression_level: u8,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            compression_level: 9,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebpOptions {
    /// When absent, the top-level `quality` applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
}

/// Background-image handling: CSS `image-set()` substitution and the support
/// stylesheet. Turning `enabled` off disables both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundImagesConfig {
    pub enabled: bool,
    pub inject_styles: bool,
    /// Selector the injected background sizing rules apply to.
    pub selector: String,
    /// Class put on generated `<picture>` elements and scoped by the stylesheet.
    pub class: String,
}

impl Default for BackgroundImagesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inject_styles: true,
            selector: ".responsive-bg".to_string(),
            class: "responsive-picture".to_string(),
        }
    }
}

/// Target widths per tier, in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizesConfig {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
    pub xl: u32,
}

impl Default for SizesConfig {
    fn default() -> Self {
        Self {
            small: 480,
            medium: 768,
            large: 1280,
            xl: 1920,
        }
    }
}

impl SizesConfig {
    pub fn width(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Small => self.small,
            Tier::Medium => self.medium,
            Tier::Large => self.large,
            Tier::Xl => self.xl,
        }
    }

    /// The ordered size profiles (ascending width).
    pub fn profiles(&self) -> Vec<SizeProfile> {
        Tier::ALL
            .iter()
            .map(|&tier| SizeProfile {
                tier,
                width: self.width(tier),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory derivative URLs are made relative to.
    pub base_dir: PathBuf,
    /// Prepended to every relative derivative URL.
    pub url_prefix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("source"),
            url_prefix: "/".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Per-format encode settings after merging, ready for the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub jpeg_quality: Quality,
    pub jpeg_progressive: bool,
    pub png_quality: Quality,
    pub png_compression: u8,
    pub webp_quality: Quality,
}

impl EncodeOptions {
    /// Encode parameters for one output format.
    ///
    /// Returns `None` for formats the pipeline never writes.
    pub fn params_for(&self, format: Format) -> Option<EncodeParams> {
        match format {
            Format::Jpeg => Some(EncodeParams::Jpeg {
                quality: self.jpeg_quality,
                progressive: self.jpeg_progressive,
            }),
            Format::Png => Some(EncodeParams::Png {
                quality: self.png_quality,
                compression_level: self.png_compression,
            }),
            Format::WebP => Some(EncodeParams::WebP {
                quality: self.webp_quality,
            }),
            _ => None,
        }
    }
}

impl PipelineConfig {
    /// Defaults with `overrides` merged on top, validated.
    pub fn resolve(overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(overrides) = overrides {
            config.merge(overrides);
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply an override set, group by group. See each `*Override::apply`.
    pub fn merge(&mut self, overrides: &ConfigOverrides) {
        if let Some(quality) = overrides.quality {
            self.quality = quality;
        }
        if let Some(jpeg) = &overrides.jpeg {
            jpeg.apply(&mut self.jpeg);
        }
        if let Some(png) = &overrides.png {
            png.apply(&mut self.png);
        }
        if let Some(webp) = &overrides.webp {
            webp.apply(&mut self.webp);
        }
        if let Some(bg) = &overrides.background_images {
            bg.apply(&mut self.background_images);
        }
        if let Some(sizes) = &overrides.sizes {
            sizes.apply(&mut self.sizes);
        }
        if let Some(paths) = &overrides.paths {
            paths.apply(&mut self.paths);
        }
        if let Some(processing) = &overrides.processing {
            processing.apply(&mut self.processing);
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_quality("quality", self.quality)?;
        check_quality("jpeg.quality", self.jpeg.quality)?;
        check_quality("png.quality", self.png.quality)?;
        if let Some(q) = self.webp.quality {
            check_quality("webp.quality", q)?;
        }
        if self.png.compression_level > 9 {
            return Err(ConfigError::Validation(
                "png.compression_level must be 0-9".into(),
            ));
        }
        let widths: Vec<u32> = self.sizes.profiles().iter().map(|p| p.width).collect();
        if widths.contains(&0) {
            return Err(ConfigError::Validation("sizes must be non-zero".into()));
        }
        if widths.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::Validation(
                "sizes must be strictly ascending: small < medium < large < xl".into(),
            ));
        }
        let class = &self.background_images.class;
        if class.is_empty() || class.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "background_images.class must be a single non-empty class name".into(),
            ));
        }
        if self.background_images.selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "background_images.selector must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn profiles(&self) -> Vec<SizeProfile> {
        self.sizes.profiles()
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            jpeg_quality: Quality::new(self.jpeg.quality),
            jpeg_progressive: self.jpeg.progressive,
            png_quality: Quality::new(self.png.quality),
            png_compression: self.png.compression_level,
            webp_quality: Quality::new(self.webp.quality.unwrap_or(self.quality)),
        }
    }
}

fn check_quality(key: &str, value: u32) -> Result<(), ConfigError> {
    if (1..=100).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{key} must be 1-100")))
    }
}

// =============================================================================
// Overrides: the host-supplied namespace, every key optional
// =============================================================================

/// User overrides as found in `respimg.toml` or supplied by a host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub quality: Option<u32>,
    pub jpeg: Option<JpegOverride>,
    pub png: Option<PngOverride>,
    pub webp: Option<WebpOverride>,
    pub background_images: Option<BackgroundImagesOverride>,
    pub sizes: Option<SizesOverride>,
    pub paths: Option<PathsOverride>,
    pub processing: Option<ProcessingOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JpegOverride {
    pub quality: Option<u32>,
    pub progressive: Option<bool>,
}

impl JpegOverride {
    /// Replace only the keys present in the override.
    pub fn apply(&self, base: &mut JpegOptions) {
        if let Some(q) = self.quality {
            base.quality = q;
        }
        if let Some(p) = self.progressive {
            base.progressive = p;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PngOverride {
    pub quality: Option<u32>,
    #[serde(alias = "compressionLevel")]
    pub compression_level: Option<u8>,
}

impl PngOverride {
    /// Replace only the keys present in the override.
    pub fn apply(&self, base: &mut PngOptions) {
        if let Some(q) = self.quality {
            base.quality = q;
        }
        if let Some(level) = self.compression_level {
            base.compression_level = level;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebpOverride {
    pub quality: Option<u32>,
}

impl WebpOverride {
    pub fn apply(&self, base: &mut WebpOptions) {
        if let Some(q) = self.quality {
            base.quality = Some(q);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundImagesOverride {
    pub enabled: Option<bool>,
    pub inject_styles: Option<bool>,
    pub selector: Option<String>,
    pub class: Option<String>,
}

impl BackgroundImagesOverride {
    /// Replace only the keys present in the override.
    pub fn apply(&self, base: &mut BackgroundImagesConfig) {
        if let Some(enabled) = self.enabled {
            base.enabled = enabled;
        }
        if let Some(inject) = self.inject_styles {
            base.inject_styles = inject;
        }
        if let Some(selector) = &self.selector {
            base.selector = selector.clone();
        }
        if let Some(class) = &self.class {
            base.class = class.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizesOverride {
    pub small: Option<u32>,
    pub medium: Option<u32>,
    pub large: Option<u32>,
    pub xl: Option<u32>,
}

impl SizesOverride {
    pub fn apply(&self, base: &mut SizesConfig) {
        if let Some(w) = self.small {
            base.small = w;
        }
        if let Some(w) = self.medium {
            base.medium = w;
        }
        if let Some(w) = self.large {
            base.large = w;
        }
        if let Some(w) = self.xl {
            base.xl = w;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsOverride {
    pub base_dir: Option<PathBuf>,
    pub url_prefix: Option<String>,
}

impl PathsOverride {
    pub fn apply(&self, base: &mut PathsConfig) {
        if let Some(dir) = &self.base_dir {
            base.base_dir = dir.clone();
        }
        if let Some(prefix) = &self.url_prefix {
            base.url_prefix = prefix.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingOverride {
    pub max_processes: Option<usize>,
}

impl ProcessingOverride {
    pub fn apply(&self, base: &mut ProcessingConfig) {
        if let Some(n) = self.max_processes {
            base.max_processes = Some(n);
        }
    }
}

// =============================================================================
// Config loading
// =============================================================================

/// Parse overrides from TOML text.
pub fn parse_overrides(content: &str) -> Result<ConfigOverrides, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load overrides from a specific file.
pub fn load_overrides_file(path: &Path) -> Result<ConfigOverrides, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_overrides(&content)
}

/// Load `respimg.toml` from a directory.
///
/// Returns `Ok(None)` if no config file exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML or unknown keys.
pub fn load_overrides(dir: &Path) -> Result<Option<ConfigOverrides>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    load_overrides_file(&config_path).map(Some)
}

/// Returns a fully-commented stock `respimg.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# respimg configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Each group is merged one level deep: a [jpeg] table that only sets
# `quality` keeps the default `progressive`.
# Unknown keys will cause an error.

# Default encode quality (1-100). Used for WebP unless [webp] sets its own.
quality = 80

# ---------------------------------------------------------------------------
# Raster fallback encoders
# ---------------------------------------------------------------------------
[jpeg]
quality = 80
progressive = true

[png]
quality = 80
# 0 (fastest) - 9 (smallest file)
compression_level = 9

# ---------------------------------------------------------------------------
# Next-gen encoder
# ---------------------------------------------------------------------------
[webp]
# quality = 80

# ---------------------------------------------------------------------------
# Background images (paths containing "background", "bg-" or "hero")
# ---------------------------------------------------------------------------
[background_images]
# Rewrite background-image: url("...") declarations into image-set().
# Turning this off also disables the support stylesheet.
enabled = true
# Inject a small <style> block before </head>.
inject_styles = true
# Selector the injected background sizing rules target.
selector = ".responsive-bg"
# Class put on generated <picture> elements.
class = "responsive-picture"

# ---------------------------------------------------------------------------
# Size tiers (pixel widths, strictly ascending)
# ---------------------------------------------------------------------------
[sizes]
small = 480
medium = 768
large = 1280
xl = 1920

# ---------------------------------------------------------------------------
# URL computation
# ---------------------------------------------------------------------------
[paths]
# Derivative URLs are computed relative to this directory.
base_dir = "source"
url_prefix = "/"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
