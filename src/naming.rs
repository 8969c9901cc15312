//! Deterministic derivative naming.
//!
//! Every derivative sits next to its source and is named after it:
//!
//! ```text
//! photos/sunset.jpg
//! photos/sunset-small.webp    photos/sunset-small.jpg
//! photos/sunset-medium.webp   photos/sunset-medium.jpg
//! photos/sunset-large.webp    photos/sunset-large.jpg
//! photos/sunset-xl.webp       photos/sunset-xl.jpg
//! ```
//!
//! The name depends only on the source stem, the tier and the output format,
//! so two builds over the same tree always write the same paths. Two sources
//! sharing a stem in the same directory (`a.jpg`, `a.png`) share their WebP
//! derivative names; see DESIGN.md for why that risk is kept.

use crate::types::{Format, Tier};
use std::path::{Path, PathBuf};

/// Source file stem, or `None` for paths without one.
pub fn base_name(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// `<base>-<tier>.<ext>`
pub fn derivative_file_name(base: &str, tier: Tier, format: Format) -> String {
    format!("{}-{}.{}", base, tier.name(), format.extension())
}

/// Output path for a derivative, co-located with `source`.
pub fn derivative_path(source: &Path, tier: Tier, format: Format) -> Option<PathBuf> {
    let base = base_name(source)?;
    let name = derivative_file_name(&base, tier, format);
    Some(match source.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    })
}

/// Temporary path an encoder writes to before the rename into place.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// If `path`'s stem ends in `-<tier>`, return the stem without that suffix.
///
/// - `sunset-small.jpg` → `Some("sunset")`
/// - `sunset-xl.webp` → `Some("sunset")`
/// - `sunset.jpg` → `None`
/// - `-small.jpg` → `None` (nothing left to be a base name)
pub fn strip_tier_suffix(path: &Path) -> Option<String> {
    let stem = base_name(path)?;
    Tier::ALL.iter().find_map(|tier| {
        stem.strip_suffix(tier.name())
            .and_then(|rest| rest.strip_suffix('-'))
            .filter(|base| !base.is_empty())
            .map(str::to_string)
    })
}
