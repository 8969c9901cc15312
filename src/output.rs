//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every source image is shown by its positional index and file name, with the
//! full path as an indented `Source:` line and one line per derivative below:
//!
//! ```text
//! Processing 3 images (8 workers)
//! 001 sunset.jpg
//!     Source: source/photos/sunset.jpg
//!     small webp: sunset-small.webp (480x360)
//!     small jpeg: sunset-small.jpg (480x360)
//!     ...
//! 002 hero.png [background]
//!     Source: source/img/hero.png
//!     ...
//! 003 anim.gif
//!     Source: source/anim.gif
//!     Skipped: unsupported format gif
//! ```
//!
//! The `plan` dry run uses the same layout with the target dimensions of each
//! planned derivative.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability. Format functions are pure: no I/O, no side effects. `main.rs`
//! does the printing.

use crate::pipeline::DryRunEntry;
use crate::process::{ProcessEvent, VariantInfo};
use crate::types::Classification;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(source_path: &str) -> String {
    Path::new(source_path)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_path.to_string())
}

/// Header line for one source: index, file name, background marker.
///
/// ```text
/// 001 sunset.jpg
/// 002 hero.png [background]
/// ```
fn source_header(index: usize, source_path: &str, classification: Option<Classification>) -> String {
    let mut line = format!("{} {}", format_index(index), file_name(source_path));
    if classification == Some(Classification::Background) {
        line.push_str(" [background]");
    }
    line
}

fn variant_line(variant: &VariantInfo) -> String {
    format!(
        "{}{} {}: {} ({}x{})",
        indent(1),
        variant.tier,
        variant.format,
        variant.file_name,
        variant.width,
        variant.height
    )
}

/// Format a single progress event from the generator.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started {
            image_count,
            threads,
        } => {
            let noun = if *image_count == 1 { "image" } else { "images" };
            vec![format!(
                "Processing {} {} ({} workers)",
                image_count, noun, threads
            )]
        }
        ProcessEvent::ImageProcessed {
            index,
            source_path,
            classification,
            variants,
        } => {
            let mut lines = vec![
                source_header(*index, source_path, Some(*classification)),
                format!("{}Source: {}", indent(1), source_path),
            ];
            lines.extend(variants.iter().map(variant_line));
            lines
        }
        ProcessEvent::Unsupported {
            index,
            source_path,
            format,
        } => vec![
            source_header(*index, source_path, None),
            format!("{}Source: {}", indent(1), source_path),
            format!("{}Skipped: unsupported format {}", indent(1), format),
        ],
        ProcessEvent::Failed {
            index,
            source_path,
            error,
        } => vec![
            source_header(*index, source_path, None),
            format!("{}Source: {}", indent(1), source_path),
            format!("{}Failed: {}", indent(1), error),
        ],
    }
}

/// Format the `plan` dry run.
pub fn format_plan(entries: &[DryRunEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut planned = 0;
    let mut derivatives = 0;

    for (i, entry) in entries.iter().enumerate() {
        let source_path = entry.path.to_string_lossy();
        match &entry.plan {
            Ok(plan) => {
                planned += 1;
                derivatives += plan.derivatives.len();
                lines.push(source_header(
                    i + 1,
                    &source_path,
                    Some(plan.source.classification),
                ));
                lines.push(format!(
                    "{}Source: {} ({} {}x{})",
                    indent(1),
                    source_path,
                    plan.source.format,
                    plan.source.width,
                    plan.source.height
                ));
                for d in &plan.derivatives {
                    let name = d
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    lines.push(format!(
                        "{}{} {}: {} ({}x{})",
                        indent(1),
                        d.tier,
                        d.format(),
                        name,
                        d.width,
                        d.height
                    ));
                }
            }
            Err(reason) => {
                lines.push(source_header(i + 1, &source_path, None));
                lines.push(format!("{}Skipped: {}", indent(1), reason));
            }
        }
    }

    lines.push(format!(
        "Planned {} derivatives for {} of {} images",
        derivatives,
        planned,
        entries.len()
    ));
    lines
}

/// Format the rewrite summary of a `build`.
///
/// ```text
/// Rewrote 2 of 14 files
///     index.html
///     css/site.css
/// ```
pub fn format_rewrite_output(changed: &[String], scanned: usize) -> Vec<String> {
    let mut lines = vec![format!("Rewrote {} of {} files", changed.len(), scanned)];
    lines.extend(changed.iter().map(|f| format!("{}{}", indent(1), f)));
    lines
}
