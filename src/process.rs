//! Derivative generation.
//!
//! Takes the discovered source paths and writes every planned derivative next
//! to its source. Produces the [`AssetRegistry`] the rewriter works from.
//!
//! ## Per-image flow
//!
//! ```text
//! probe ──▶ plan ──▶ for each (tier, format):
//!                       resize + encode  (backend, in memory)
//!                       write <path>.tmp
//!                       delete <path>    (ignored if absent)
//!                       rename <path>.tmp → <path>
//! ```
//!
//! Existing derivatives are always overwritten; there is no cache.
//!
//! ## Failure isolation
//!
//! Every error inside one image (probe, decode, encode, write) is caught for
//! that image alone. Its temp file is removed, it gets no [`AssetRecord`], and
//! the batch carries on. Unsupported formats are reported and skipped the
//! same way. Nothing here aborts the build.
//!
//! ## Parallel Processing
//!
//! Images run on a local [rayon](https://docs.rs/rayon) pool sized by
//! [`effective_threads`]. Tiers within one image run in order. Workers never
//! see the registry: each returns an [`Outcome`], the `collect()` is the
//! barrier, and a single collector files the records afterwards.

use crate::config::{EncodeOptions, PipelineConfig, effective_threads};
use crate::imaging::{BackendError, ImageBackend};
use crate::naming;
use crate::plan::{PlanError, PlannedDerivative, plan_variants, probe_source};
use crate::registry::AssetRegistry;
use crate::types::{AssetRecord, Classification, Format, SizeProfile, Tier};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Image processing failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Plan(PlanError),
}

/// Status of a single derivative, for progress display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    pub tier: Tier,
    pub format: Format,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
}

/// Progress events emitted while the batch runs.
///
/// Sent in completion order, which differs from discovery order when more
/// than one worker is running.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Started {
        image_count: usize,
        threads: usize,
    },
    ImageProcessed {
        /// 1-based position in discovery order.
        index: usize,
        source_path: String,
        classification: Classification,
        variants: Vec<VariantInfo>,
    },
    Unsupported {
        index: usize,
        source_path: String,
        format: Format,
    },
    Failed {
        index: usize,
        source_path: String,
        error: String,
    },
}

/// What one worker produced for one source.
#[derive(Debug)]
enum Outcome {
    Generated(AssetRecord),
    Unsupported(Format),
    Failed(ProcessError),
}

/// Batch counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStats {
    /// Source paths handed to the generator.
    pub sources: usize,
    /// Sources that produced a complete record.
    pub generated: usize,
    /// Derivative files written for those records.
    pub derivatives: usize,
    pub unsupported: usize,
    pub failed: usize,
}

impl fmt::Display for ProcessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} images processed, {} files written",
            self.generated, self.sources, self.derivatives
        )?;
        if self.unsupported > 0 {
            write!(f, ", {} unsupported", self.unsupported)?;
        }
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}

/// Result of a generation batch.
#[derive(Debug)]
pub struct ProcessResult {
    pub registry: AssetRegistry,
    pub stats: ProcessStats,
}

/// Generate every derivative for `sources` and collect the registry.
///
/// When `events` is given, progress events are sent on it; the sender is
/// dropped on return so a receiving loop ends.
pub fn process<B: ImageBackend>(
    sources: &[PathBuf],
    config: &PipelineConfig,
    backend: &B,
    events: Option<Sender<ProcessEvent>>,
) -> ProcessResult {
    let profiles = config.profiles();
    let encode = config.encode_options();
    let threads = effective_threads(&config.processing);

    emit(
        &events,
        ProcessEvent::Started {
            image_count: sources.len(),
            threads,
        },
    );
    info!(images = sources.len(), threads, "generating derivatives");

    let job = Job {
        profiles: &profiles,
        encode: &encode,
        backend,
        events: &events,
    };

    let outcomes: Vec<Outcome> = match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
    {
        Ok(pool) => pool.install(|| {
            sources
                .par_iter()
                .enumerate()
                .map(|(i, path)| job.run(i + 1, path))
                .collect()
        }),
        Err(e) => {
            warn!("worker pool unavailable ({e}), processing sequentially");
            sources
                .iter()
                .enumerate()
                .map(|(i, path)| job.run(i + 1, path))
                .collect()
        }
    };

    // Barrier passed: single collector from here on.
    let mut registry = AssetRegistry::new();
    let mut stats = ProcessStats {
        sources: sources.len(),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            Outcome::Generated(record) => {
                stats.generated += 1;
                stats.derivatives += record.derivatives.len();
                registry.insert(record);
            }
            Outcome::Unsupported(_) => stats.unsupported += 1,
            Outcome::Failed(_) => stats.failed += 1,
        }
    }

    info!(%stats, "generation finished");
    ProcessResult { registry, stats }
}

/// Everything a worker needs, shared by reference across the pool.
struct Job<'a, B> {
    profiles: &'a [SizeProfile],
    encode: &'a EncodeOptions,
    backend: &'a B,
    events: &'a Option<Sender<ProcessEvent>>,
}

impl<B: ImageBackend> Job<'_, B> {
    fn run(&self, index: usize, path: &Path) -> Outcome {
        let source_path = path.to_string_lossy().into_owned();
        let outcome = self.generate(path);
        match &outcome {
            Outcome::Generated(record) => {
                debug!(source = %source_path, files = record.derivatives.len(), "generated");
                emit(
                    self.events,
                    ProcessEvent::ImageProcessed {
                        index,
                        source_path,
                        classification: record.classification,
                        variants: record
                            .derivatives
                            .iter()
                            .map(|d| VariantInfo {
                                tier: d.tier,
                                format: d.format,
                                width: d.width,
                                height: d.height,
                                file_name: d.file_name(),
                            })
                            .collect(),
                    },
                );
            }
            Outcome::Unsupported(format) => {
                info!(source = %source_path, %format, "skipping unsupported format");
                emit(
                    self.events,
                    ProcessEvent::Unsupported {
                        index,
                        source_path,
                        format: *format,
                    },
                );
            }
            Outcome::Failed(error) => {
                warn!(source = %source_path, %error, "image failed, no derivatives registered");
                emit(
                    self.events,
                    ProcessEvent::Failed {
                        index,
                        source_path,
                        error: error.to_string(),
                    },
                );
            }
        }
        outcome
    }

    fn generate(&self, path: &Path) -> Outcome {
        let source = match probe_source(self.backend, path) {
            Ok(source) => source,
            Err(e) => return Outcome::Failed(e.into()),
        };
        let plan = match plan_variants(&source, self.profiles, self.encode) {
            Ok(plan) => plan,
            Err(PlanError::UnsupportedFormat { format, .. }) => {
                return Outcome::Unsupported(format);
            }
            Err(e) => return Outcome::Failed(ProcessError::Plan(e)),
        };

        let mut derivatives = Vec::with_capacity(plan.derivatives.len());
        for planned in &plan.derivatives {
            if let Err(e) = write_derivative(self.backend, &source.path, planned) {
                return Outcome::Failed(e);
            }
            derivatives.push(planned.to_derivative());
        }
        Outcome::Generated(AssetRecord::new(&plan.source, derivatives))
    }
}

/// Encode one derivative and move it into place.
fn write_derivative(
    backend: &impl ImageBackend,
    source: &Path,
    planned: &PlannedDerivative,
) -> Result<(), ProcessError> {
    let bytes = backend.resize(&planned.resize_params(source))?;
    let tmp = naming::temp_path(&planned.path);
    replace_file(&tmp, &planned.path, &bytes).map_err(|err| {
        // The temp file may not exist if the write itself failed.
        let _ = fs::remove_file(&tmp);
        ProcessError::Io {
            path: planned.path.clone(),
            source: err,
        }
    })
}

/// Write `bytes` to `tmp`, remove `target` if present, rename `tmp` onto it.
fn replace_file(tmp: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(tmp, bytes)?;
    match fs::remove_file(target) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    fs::rename(tmp, target)
}

fn emit(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is watching.
        let _ = tx.send(event);
    }
}
