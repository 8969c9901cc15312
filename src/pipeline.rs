//! Build lifecycle: generate before rendering, rewrite after.
//!
//! A [`Pipeline`] lives for exactly one build:
//!
//! ```text
//! pre_render(roots)                      post_render(text)  × every document
//!   discover → probe/plan → generate       rewrite against the frozen registry
//!   freeze registry ───────── barrier ───▶
//! ```
//!
//! The registry is published through a [`OnceLock`]; `post_render` only ever
//! reads it, so rendering can never trigger generation. Before the barrier
//! `post_render` passes text through untouched.
//!
//! Hosts plug in through [`BuildHost`]. [`register`] wires the two hooks into
//! the host's [`FilterRegistry`] when it has one and does nothing otherwise.

use crate::config::{ConfigError, ConfigOverrides, PipelineConfig};
use crate::discover::{DiscoveryError, discover};
use crate::imaging::ImageBackend;
use crate::plan::{VariantPlan, plan_variants, probe_source};
use crate::process::{ProcessEvent, ProcessStats, process};
use crate::registry::AssetRegistry;
use crate::rewrite::{RewriteOptions, Rewriter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, OnceLock};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("Derivatives were already generated for this build")]
    AlreadyGenerated,
}

/// Hook run once before rendering starts.
pub type BeforeGenerate = Box<dyn Fn() -> Result<(), PipelineError> + Send + Sync>;
/// Hook run on every rendered document.
pub type AfterRender = Box<dyn Fn(&str) -> String + Send + Sync>;

/// A host's hook extension point.
pub trait FilterRegistry {
    fn before_generate(&mut self, hook: BeforeGenerate);
    fn after_render(&mut self, hook: AfterRender);
}

/// What the pipeline needs from the build system hosting it.
pub trait BuildHost {
    fn source_dir(&self) -> PathBuf;

    fn theme_dir(&self) -> Option<PathBuf>;

    /// User overrides for the pipeline's configuration namespace.
    fn overrides(&self) -> Option<&ConfigOverrides>;

    /// `None` when the host has no hook mechanism.
    fn filters(&mut self) -> Option<&mut dyn FilterRegistry>;

    /// Discovery roots: source first, then theme.
    fn roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.source_dir()];
        roots.extend(self.theme_dir());
        roots
    }
}

/// Registry and rewriter, published together at the barrier.
struct Frozen {
    registry: AssetRegistry,
    rewriter: Rewriter,
}

/// One dry-run line: a discovered source and its plan, or why it has none.
#[derive(Debug)]
pub struct DryRunEntry {
    pub path: PathBuf,
    pub plan: Result<VariantPlan, String>,
}

pub struct Pipeline<B> {
    config: PipelineConfig,
    backend: B,
    events: Mutex<Option<Sender<ProcessEvent>>>,
    started: AtomicBool,
    frozen: OnceLock<Frozen>,
}

impl<B: ImageBackend> Pipeline<B> {
    pub fn new(config: PipelineConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            events: Mutex::new(None),
            started: AtomicBool::new(false),
            frozen: OnceLock::new(),
        }
    }

    /// Resolve the host's overrides against the defaults and build a pipeline.
    pub fn from_host<H: BuildHost + ?Sized>(host: &H, backend: B) -> Result<Self, PipelineError> {
        let config = PipelineConfig::resolve(host.overrides())?;
        Ok(Self::new(config, backend))
    }

    /// Send generation progress to `tx`. The sender is dropped when
    /// generation finishes.
    pub fn with_events(self, tx: Sender<ProcessEvent>) -> Self {
        if let Ok(mut events) = self.events.lock() {
            *events = Some(tx);
        }
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The frozen registry, once `pre_render` has finished.
    pub fn registry(&self) -> Option<&AssetRegistry> {
        self.frozen.get().map(|f| &f.registry)
    }

    /// Discover, plan and generate, then freeze the registry.
    ///
    /// Only a discovery failure is an error; per-image problems are counted
    /// in the returned stats. Runs at most once per pipeline.
    pub fn pre_render(&self, roots: &[PathBuf]) -> Result<ProcessStats, PipelineError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(PipelineError::AlreadyGenerated);
        }

        let sources = discover(roots)?;
        info!(sources = sources.len(), "discovered source images");

        let events = self.events.lock().ok().and_then(|mut e| e.take());
        let result = process(&sources, &self.config, &self.backend, events);

        let rewriter = Rewriter::new(&result.registry, &RewriteOptions::from_config(&self.config));
        debug!(rules = rewriter.rule_count(), "rewriter ready");
        self.frozen
            .set(Frozen {
                registry: result.registry,
                rewriter,
            })
            .map_err(|_| PipelineError::AlreadyGenerated)?;

        Ok(result.stats)
    }

    /// Rewrite one rendered document against the frozen registry.
    pub fn post_render(&self, text: &str) -> String {
        match self.frozen.get() {
            Some(frozen) => frozen.rewriter.rewrite(text),
            None => {
                warn!("document rendered before derivatives were generated; left unchanged");
                text.to_string()
            }
        }
    }

    /// Discover and plan without writing anything.
    pub fn dry_run(&self, roots: &[PathBuf]) -> Result<Vec<DryRunEntry>, PipelineError> {
        let profiles = self.config.profiles();
        let encode = self.config.encode_options();
        let entries = discover(roots)?
            .into_iter()
            .map(|path| {
                let plan = probe_source(&self.backend, &path)
                    .map_err(|e| e.to_string())
                    .and_then(|source| {
                        plan_variants(&source, &profiles, &encode).map_err(|e| e.to_string())
                    });
                DryRunEntry { path, plan }
            })
            .collect();
        Ok(entries)
    }
}

/// Wire `pipeline` into the host's hooks.
///
/// Returns `false`, registering nothing, when the host has no hook mechanism.
pub fn register<H, B>(host: &mut H, pipeline: Arc<Pipeline<B>>) -> bool
where
    H: BuildHost + ?Sized,
    B: ImageBackend + Send + 'static,
{
    let roots = host.roots();
    let Some(filters) = host.filters() else {
        debug!("host has no filter registry, pipeline not registered");
        return false;
    };

    let generate = Arc::clone(&pipeline);
    filters.before_generate(Box::new(move || {
        let stats = generate.pre_render(&roots)?;
        info!(%stats, "derivatives ready");
        Ok(())
    }));
    filters.after_render(Box::new(move |text: &str| pipeline.post_render(text)));
    true
}
