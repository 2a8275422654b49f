//! CLI binary for mcq-extract.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and writes JSONL.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mcq_extract::{
    cleaned_text, extract, write_jsonl, write_jsonl_file, ConvergenceState, ConvergenceTarget,
    ExtractionConfig, ExtractionProgressCallback, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar tick per attempt, with a log line
/// showing expected vs produced counts.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_extraction_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:30.green/238}] {pos}/{len} attempts  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, max_attempts: u32) {
        self.bar.set_length(max_attempts as u64);
    }

    fn on_attempt_start(&self, attempt: u32, _max: u32) {
        self.bar.set_message(format!("attempt {attempt}"));
    }

    fn on_attempt_complete(&self, attempt: u32, expected: usize, produced: usize) {
        let mark = if expected == produced {
            green("✓")
        } else {
            red("✗")
        };
        self.bar.println(format!(
            "  {} Attempt {}  {}",
            mark,
            attempt,
            dim(&format!("expected {expected}, extracted {produced}")),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, state: ConvergenceState, attempts: u32) {
        self.bar.finish_and_clear();
        match state {
            ConvergenceState::Converged => eprintln!(
                "{} converged after {} attempt(s)",
                green("✔"),
                bold(&attempts.to_string())
            ),
            ConvergenceState::Exhausted => eprintln!(
                "{} no match after {} attempts; keeping partial result",
                cyan("⚠"),
                bold(&attempts.to_string())
            ),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract to stdout
  mcq2jsonl paper.txt

  # Extract to a file, keeping the cleaned intermediate text
  mcq2jsonl paper.txt -o paper.jsonl --cleaned paper.cleaned.txt

  # Don't count image-only questions towards the expected total
  mcq2jsonl --target parseable paper.txt

  # JEE papers tag years as [JEE Main 2021]
  mcq2jsonl --year-tag JEE paper.txt

  # Fail (exit 1) when the record count never matches
  mcq2jsonl --strict paper.txt -o paper.jsonl

INPUT FORMAT:
  UTF-8 text as produced by a PDF-to-text or OCR step. Questions start with
  `Question<N>`, options follow `Options:` as `A. … B. … C. … D. …`, and the
  key is given as `Answer: <A-D>`. `[Page N]` labels and form-feed page
  breaks are both accepted.

ENVIRONMENT VARIABLES:
  RUST_LOG               Override the log filter (e.g. mcq_extract=debug)
"#;

/// Convert extracted MCQ paper text into JSONL records.
#[derive(Parser, Debug)]
#[command(
    name = "mcq2jsonl",
    version,
    about = "Convert extracted MCQ paper text into JSONL records",
    long_about = "Convert the extracted text of a multiple-choice question paper into one JSON \
record per question (question, four options, answer, optional year), checking the record count \
against the paper's own question numbering.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// UTF-8 text file extracted from the question paper.
    input: PathBuf,

    /// Write JSONL to this file instead of stdout.
    #[arg(short, long, env = "MCQ_OUTPUT")]
    output: Option<PathBuf>,

    /// Also write the cleaned, renumbered question text to this file.
    #[arg(long, env = "MCQ_CLEANED")]
    cleaned: Option<PathBuf>,

    /// Maximum extraction attempts before accepting a partial result.
    #[arg(long, env = "MCQ_MAX_ATTEMPTS", default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: u32,

    /// Which questions must all be extracted: all, parseable.
    #[arg(long, env = "MCQ_TARGET", value_enum, default_value = "all")]
    target: TargetArg,

    /// Tag word of year annotations, as in [NEET 2019].
    #[arg(long, env = "MCQ_YEAR_TAG", default_value = "NEET")]
    year_tag: String,

    /// Exit with an error when the record count never matches.
    #[arg(long, env = "MCQ_STRICT")]
    strict: bool,

    /// Print extraction statistics as JSON on stderr.
    #[arg(long, env = "MCQ_JSON_STATS")]
    json_stats: bool,

    /// Disable progress bar.
    #[arg(long, env = "MCQ_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MCQ_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MCQ_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum TargetArg {
    All,
    Parseable,
}

impl From<TargetArg> for ConvergenceTarget {
    fn from(v: TargetArg) -> Self {
        match v {
            TargetArg::All => ConvergenceTarget::AllMarkers,
            TargetArg::Parseable => ConvergenceTarget::ParseableMarkers,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar already reports every attempt, so library INFO/WARN
    // lines are suppressed while it is shown.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let extraction = extract(&cli.input, &config)
        .await
        .with_context(|| format!("Extraction failed for {}", cli.input.display()))?;

    if let Some(ref path) = cli.output {
        write_jsonl_file(&extraction.records, path).context("Failed to write JSONL output")?;
    } else {
        write_jsonl(&extraction.records, io::stdout().lock())
            .context("Failed to write to stdout")?;
    }

    if let Some(ref path) = cli.cleaned {
        tokio::fs::write(path, cleaned_text(&extraction.records))
            .await
            .with_context(|| format!("Failed to write cleaned text to {:?}", path))?;
    }

    // ── Report ───────────────────────────────────────────────────────────
    let stats = &extraction.stats;
    if cli.json_stats {
        eprintln!(
            "{}",
            serde_json::to_string_pretty(stats).context("Failed to serialise stats")?
        );
    }
    if !cli.quiet {
        eprintln!(
            "{}  {}/{} questions  {}",
            if extraction.is_converged() {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.produced,
            stats.target,
            dim(&format!(
                "{} image-only, {} malformed, {}ms",
                stats.image_only, stats.malformed, stats.total_duration_ms
            )),
        );
        if let Some(ref path) = cli.output {
            eprintln!("   →  {}", bold(&path.display().to_string()));
        }
    }

    if cli.strict {
        extraction
            .into_result()
            .context("Record count does not match the question numbering")?;
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .max_attempts(cli.max_attempts)
        .target(cli.target.clone().into())
        .year_tag(cli.year_tag.clone());

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
