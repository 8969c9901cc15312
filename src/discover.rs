//! Source image discovery.
//!
//! Each root is expanded with one recursive glob per source extension:
//!
//! ```text
//! <root>/**/*.jpg
//! <root>/**/*.jpeg
//! <root>/**/*.png
//! ```
//!
//! Results come back in root order, then pattern order, then the order the
//! glob walker yields them, with duplicates dropped. Extension matching ignores
//! case. A root that does not exist contributes nothing.
//!
//! Files written by an earlier build sit next to their sources and match the
//! same patterns (`sunset-small.jpg`). A candidate is treated as a previous
//! derivative, and skipped, when its stem ends in `-<tier>` **and** the
//! stripped base name is itself a candidate in the same directory. A lone
//! `team-small.jpg` with no `team.*` next to it is still a source.
//!
//! Any bad pattern or unreadable directory fails the whole discovery.

use crate::naming;
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Source extensions, in pattern order.
pub const SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Invalid glob pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("Failed to traverse {path}: {source}")]
    Traversal {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Glob patterns for one root, in pattern order.
pub fn patterns_for(root: &Path) -> Vec<String> {
    let escaped = Pattern::escape(&root.to_string_lossy());
    SOURCE_EXTENSIONS
        .iter()
        .map(|ext| format!("{}/**/*.{}", escaped, ext))
        .collect()
}

/// Find every source image under `roots`.
pub fn discover(roots: &[PathBuf]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for root in roots {
        for pattern in patterns_for(root) {
            let paths = glob::glob_with(&pattern, options).map_err(|source| {
                DiscoveryError::Pattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;
            for entry in paths {
                let path = entry.map_err(|e| DiscoveryError::Traversal {
                    path: e.path().to_path_buf(),
                    source: e.into_error(),
                })?;
                if path.is_file() && seen.insert(path.clone()) {
                    candidates.push(path);
                }
            }
        }
    }

    let sources = drop_previous_derivatives(candidates);
    debug!(count = sources.len(), "discovered source images");
    Ok(sources)
}

/// Remove candidates that are derivatives of another candidate.
fn drop_previous_derivatives(candidates: Vec<PathBuf>) -> Vec<PathBuf> {
    let stems: HashSet<(PathBuf, String)> = candidates
        .iter()
        .filter_map(|path| Some((parent_of(path), naming::base_name(path)?)))
        .collect();

    candidates
        .into_iter()
        .filter(|path| match naming::strip_tier_suffix(path) {
            Some(base) => {
                let derived = stems.contains(&(parent_of(path), base));
                if derived {
                    debug!(path = %path.display(), "skipping previously generated derivative");
                }
                !derived
            }
            None => true,
        })
        .collect()
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"x").unwrap();
        path
    }

    fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn patterns_per_extension() {
        let patterns = patterns_for(Path::new("site/source"));
        assert_eq!(
            patterns,
            vec![
                "site/source/**/*.jpg",
                "site/source/**/*.jpeg",
                "site/source/**/*.png"
            ]
        );
    }

    #[test]
    fn patterns_escape_root_metacharacters() {
        let patterns = patterns_for(Path::new("site[1]"));
        assert_eq!(patterns[0], "site[[]1[]]/**/*.jpg");
    }

    #[test]
    fn finds_nested_sources_in_pattern_order() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b.png");
        touch(tmp.path(), "photos/a.jpg");
        touch(tmp.path(), "photos/deep/c.jpeg");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "anim.gif");

        let found = discover(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(
            names(&found, tmp.path()),
            vec!["photos/a.jpg", "photos/deep/c.jpeg", "b.png"]
        );
    }

    #[test]
    fn extension_match_ignores_case() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "UPPER.JPG");
        let found = discover(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn roots_in_order_and_deduplicated() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let theme = tmp.path().join("theme");
        touch(&source, "a.jpg");
        touch(&theme, "t.jpg");

        let found = discover(&[source.clone(), theme.clone(), source.clone()]).unwrap();
        assert_eq!(found, vec![source.join("a.jpg"), theme.join("t.jpg")]);
    }

    #[test]
    fn missing_root_contributes_nothing() {
        let tmp = TempDir::new().unwrap();
        let found = discover(&[tmp.path().join("absent")]).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn skips_previous_derivatives() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "sunset.jpg");
        touch(tmp.path(), "sunset-small.jpg");
        touch(tmp.path(), "sunset-xl.jpg");
        touch(tmp.path(), "logo.png");
        touch(tmp.path(), "logo-medium.png");

        let found = discover(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(names(&found, tmp.path()), vec!["sunset.jpg", "logo.png"]);
    }

    #[test]
    fn tier_suffix_without_base_is_a_source() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "team-small.jpg");
        // Same base in another directory does not count
        touch(tmp.path(), "other/team.jpg");

        let found = discover(&[tmp.path().to_path_buf()]).unwrap();
        let found = names(&found, tmp.path());
        assert_eq!(found.len(), 2);
        assert!(found.contains(&"team-small.jpg".to_string()));
        assert!(found.contains(&"other/team.jpg".to_string()));
    }

    #[test]
    fn directories_named_like_images_are_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("folder.jpg")).unwrap();
        touch(tmp.path(), "folder.jpg/inner.png");

        let found = discover(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(names(&found, tmp.path()), vec!["folder.jpg/inner.png"]);
    }
}
