use clap::{Parser, Subcommand};
use respimg::config::{self, ConfigOverrides};
use respimg::imaging::RustBackend;
use respimg::output;
use respimg::pipeline::{
    AfterRender, BeforeGenerate, BuildHost, FilterRegistry, Pipeline, PipelineError, register,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "respimg")]
#[command(about = "Responsive image derivatives and markup rewriting for static sites")]
#[command(long_about = "\
Responsive image derivatives and markup rewriting for static sites

Every JPEG and PNG under the source and theme directories is resized to four
width tiers, each written as WebP and in the source's own format, next to the
original:

  source/photos/sunset.jpg
  source/photos/sunset-small.webp    sunset-small.jpg     480px
  source/photos/sunset-medium.webp   sunset-medium.jpg    768px
  source/photos/sunset-large.webp    sunset-large.jpg    1280px
  source/photos/sunset-xl.webp       sunset-xl.jpg       1920px

Rendered pages are then rewritten:

  <img src=\"source/photos/sunset.jpg\">      → <picture> with WebP + JPEG srcsets
  background-image: url(\"source/img/hero.jpg\")  → image-set() with 1x/2x/3x

Paths containing \"background\", \"bg-\" or \"hero\" are background images.

Run 'respimg gen-config' to generate a documented respimg.toml.
Set RUST_LOG=debug for diagnostic logging.")]
#[command(version)]
struct Cli {
    /// Source directory scanned for images
    #[arg(long, default_value = "source", global = true)]
    source: PathBuf,

    /// Theme directory, scanned after the source directory
    #[arg(long, global = true)]
    theme: Option<PathBuf>,

    /// Rendered site whose .html and .css files are rewritten
    #[arg(long, default_value = "public", global = true)]
    public: PathBuf,

    /// Config file (default: ./respimg.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the asset registry as JSON to this file
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate derivatives, then rewrite the rendered site in place
    Build,
    /// List the derivatives a build would write, without writing anything
    Plan,
    /// Generate derivatives, then print one rewritten file to stdout
    Rewrite {
        /// Rendered HTML or CSS file (left unmodified)
        file: PathBuf,
    },
    /// Print a stock respimg.toml with all options documented
    GenConfig,
}

/// Hook storage for the CLI acting as a build host.
#[derive(Default)]
struct Hooks {
    before: Vec<BeforeGenerate>,
    after: Vec<AfterRender>,
}

impl FilterRegistry for Hooks {
    fn before_generate(&mut self, hook: BeforeGenerate) {
        self.before.push(hook);
    }

    fn after_render(&mut self, hook: AfterRender) {
        self.after.push(hook);
    }
}

impl Hooks {
    fn generate(&self) -> Result<(), PipelineError> {
        self.before.iter().try_for_each(|hook| hook())
    }

    fn render(&self, text: &str) -> String {
        self.after
            .iter()
            .fold(text.to_string(), |text, hook| hook(&text))
    }
}

struct SiteHost {
    source: PathBuf,
    theme: Option<PathBuf>,
    overrides: Option<ConfigOverrides>,
    hooks: Hooks,
}

impl SiteHost {
    fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let overrides = match &cli.config {
            Some(path) => Some(config::load_overrides_file(path)?),
            None => config::load_overrides(Path::new("."))?,
        };
        Ok(Self {
            source: cli.source.clone(),
            theme: cli.theme.clone(),
            overrides,
            hooks: Hooks::default(),
        })
    }
}

impl BuildHost for SiteHost {
    fn source_dir(&self) -> PathBuf {
        self.source.clone()
    }

    fn theme_dir(&self) -> Option<PathBuf> {
        self.theme.clone()
    }

    fn overrides(&self) -> Option<&ConfigOverrides> {
        self.overrides.as_ref()
    }

    fn filters(&mut self) -> Option<&mut dyn FilterRegistry> {
        Some(&mut self.hooks)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Plan => {
            let host = SiteHost::from_cli(&cli)?;
            let pipeline = Pipeline::from_host(&host, RustBackend::new())?;
            let entries = pipeline.dry_run(&host.roots())?;
            for line in output::format_plan(&entries) {
                println!("{}", line);
            }
        }
        Command::Build => {
            let mut host = SiteHost::from_cli(&cli)?;

            println!("==> Stage 1: Generating derivatives");
            generate(&mut host, cli.manifest.as_deref(), Stream::Stdout)?;

            println!("==> Stage 2: Rewriting {}", cli.public.display());
            if cli.public.is_dir() {
                let (changed, scanned) = rewrite_site(&cli.public, &host.hooks)?;
                for line in output::format_rewrite_output(&changed, scanned) {
                    println!("{}", line);
                }
            } else {
                println!("No rendered site at {}, nothing to rewrite", cli.public.display());
            }

            println!("==> Build complete");
        }
        Command::Rewrite { file } => {
            let mut host = SiteHost::from_cli(&cli)?;
            let text = std::fs::read_to_string(file)?;
            // stdout carries the rewritten file; progress goes to stderr
            generate(&mut host, cli.manifest.as_deref(), Stream::Stderr)?;
            print!("{}", host.hooks.render(&text));
        }
    }

    Ok(())
}

/// Install the diagnostic subscriber. `RUST_LOG` overrides the default `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Where progress lines are printed.
#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn line(self, line: &str) {
        match self {
            Stream::Stdout => println!("{}", line),
            Stream::Stderr => eprintln!("{}", line),
        }
    }
}

/// Register the pipeline on the host and run its pre-render phase, printing
/// progress as images complete.
fn generate(
    host: &mut SiteHost,
    manifest: Option<&Path>,
    progress: Stream,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                progress.line(&line);
            }
        }
    });

    let pipeline = Arc::new(Pipeline::from_host(&*host, RustBackend::new())?.with_events(tx));
    register(host, Arc::clone(&pipeline));
    host.hooks.generate()?;
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    if let Some(registry) = pipeline.registry() {
        progress.line(&format!(
            "Registered {} images ({} derivatives)",
            registry.len(),
            registry.derivative_count()
        ));
        if let Some(path) = manifest {
            std::fs::write(path, serde_json::to_string_pretty(registry)?)?;
            progress.line(&format!("Manifest: {}", path.display()));
        }
    }
    Ok(())
}

/// Rewrite every `.html` and `.css` file under `public` in place.
///
/// Returns the changed files (relative to `public`) and the number scanned.
/// Files that are not valid UTF-8 are logged and left alone.
fn rewrite_site(
    public: &Path,
    hooks: &Hooks,
) -> Result<(Vec<String>, usize), Box<dyn std::error::Error>> {
    let mut changed = Vec::new();
    let mut scanned = 0;

    for entry in WalkDir::new(public).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_rendered_output(entry.path()) {
            continue;
        }
        scanned += 1;
        let text = match String::from_utf8(std::fs::read(entry.path())?) {
            Ok(text) => text,
            Err(_) => {
                warn!(path = %entry.path().display(), "not valid UTF-8, skipped");
                continue;
            }
        };
        let rewritten = hooks.render(&text);
        if rewritten != text {
            std::fs::write(entry.path(), rewritten)?;
            let relative = entry.path().strip_prefix(public).unwrap_or(entry.path());
            changed.push(relative.display().to_string());
        }
    }
    Ok((changed, scanned))
}

fn is_rendered_output(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("css"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn marking_hooks() -> Hooks {
        let mut hooks = Hooks::default();
        hooks.after_render(Box::new(|text: &str| text.replace("old.jpg", "new.webp")));
        hooks
    }

    #[test]
    fn rewrite_site_skips_files_that_are_not_utf8() {
        let tmp = tempfile::TempDir::new().unwrap();
        let public = tmp.path();
        fs::write(public.join("a.html"), "<img src=\"old.jpg\">").unwrap();
        fs::write(public.join("b.css"), [0xFF, 0xFE, b'o', b'l', b'd']).unwrap();
        fs::create_dir(public.join("css")).unwrap();
        fs::write(public.join("css/site.css"), "url(\"old.jpg\")").unwrap();

        let (changed, scanned) = rewrite_site(public, &marking_hooks()).unwrap();

        assert_eq!(scanned, 3);
        assert_eq!(changed, vec!["a.html".to_string(), "css/site.css".to_string()]);
        assert_eq!(
            fs::read(public.join("b.css")).unwrap(),
            [0xFF, 0xFE, b'o', b'l', b'd']
        );
        assert_eq!(
            fs::read_to_string(public.join("css/site.css")).unwrap(),
            "url(\"new.webp\")"
        );
    }

    #[test]
    fn version_is_the_crate_version() {
        use clap::CommandFactory;
        assert_eq!(Cli::command().get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn rewrite_site_ignores_other_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.txt"), "old.jpg").unwrap();

        let (changed, scanned) = rewrite_site(tmp.path(), &marking_hooks()).unwrap();

        assert_eq!(scanned, 0);
        assert!(changed.is_empty());
        assert_eq!(
            fs::read_to_string(tmp.path().join("notes.txt")).unwrap(),
            "old.jpg"
        );
    }
}
