//! Build-scoped store of generated assets.
//!
//! Two buckets, foreground and background, each keyed by the full source path
//! exactly as discovery produced it. Only the generator's collector inserts,
//! and only after the worker barrier; once the pipeline freezes the registry
//! there is no way to mutate it.
//!
//! Serializes to JSON for the CLI's `--manifest` output:
//!
//! ```text
//! {
//!   "foreground": { "source/photos/sunset.jpg": { ...AssetRecord } },
//!   "background": { "source/img/hero.png": { ... } }
//! }
//! ```

use crate::types::{AssetRecord, Classification};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetRegistry {
    foreground: BTreeMap<String, AssetRecord>,
    background: BTreeMap<String, AssetRecord>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a record under its classification. A second record for the same
    /// source path replaces the first.
    pub(crate) fn insert(&mut self, record: AssetRecord) {
        let bucket = match record.classification {
            Classification::Foreground => &mut self.foreground,
            Classification::Background => &mut self.background,
        };
        bucket.insert(record.source_path.clone(), record);
    }

    /// Look up a record in either bucket by its source path.
    pub fn get(&self, source_path: &str) -> Option<&AssetRecord> {
        self.foreground
            .get(source_path)
            .or_else(|| self.background.get(source_path))
    }

    pub fn foreground(&self) -> impl Iterator<Item = &AssetRecord> {
        self.foreground.values()
    }

    pub fn background(&self) -> impl Iterator<Item = &AssetRecord> {
        self.background.values()
    }

    /// Every record, foreground first.
    pub fn records(&self) -> impl Iterator<Item = &AssetRecord> {
        self.foreground().chain(self.background())
    }

    pub fn len(&self) -> usize {
        self.foreground.len() + self.background.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total derivative files across all records.
    pub fn derivative_count(&self) -> usize {
        self.records().map(|r| r.derivatives.len()).sum()
    }
}

impl FromIterator<AssetRecord> for AssetRegistry {
    fn from_iter<I: IntoIterator<Item = AssetRecord>>(iter: I) -> Self {
        let mut registry = Self::new();
        for record in iter {
            registry.insert(record);
        }
        registry
    }
}
