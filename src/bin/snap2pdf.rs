//! CLI binary for snap2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`,
//! wires Ctrl-C/SIGTERM to the cancellation token, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use snap2pdf::{
    run, CancelToken, MergeOrder, ProgressCallback, RunConfig, RunProgressCallback,
};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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

/// Terminal progress callback: one bar for the batch, a log line per URL.
/// Jobs complete out of input order, so per-URL start times are keyed by URL.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<String, Instant>>,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_run_start` once the
    /// URL list has been read.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading URL list…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} urls  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Snapping");
        self.bar.reset_eta();
    }

    fn elapsed_secs(&self, url: &str) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(url)
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_jobs: usize) {
        self.activate_bar(total_jobs);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Snapping {total_jobs} urls…"))
        ));
    }

    fn on_job_start(&self, url: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(url.to_string(), Instant::now());
        self.bar.set_message(url.to_string());
    }

    fn on_job_complete(&self, url: &str, cached: bool) {
        let elapsed = self.elapsed_secs(url);
        let note = if cached { dim("cached") } else { dim(&format!("{elapsed:.1}s")) };
        self.bar
            .println(format!("  {} {url}  {note}", green("✓")));
        self.bar.inc(1);
    }

    fn on_job_error(&self, url: &str, error: String) {
        let _ = self.elapsed_secs(url);
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 120 {
            let head: String = error.chars().take(119).collect();
            format!("{head}\u{2026}")
        } else {
            error
        };
        self.bar
            .println(format!("  {} {url}  {}", red("✗"), red(&msg)));
        self.bar.inc(1);
    }

    fn on_merge_start(&self, files: usize) {
        self.bar.set_prefix("Binding");
        self.bar.set_message(format!("{files} pdfs"));
    }

    fn on_run_complete(&self, total_jobs: usize, merged_files: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} urls snapped, {} pages bound",
            green("✔"),
            bold(&total_jobs.to_string()),
            bold(&merged_files.to_string()),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Read urls.csv (header must contain a `url` column), write output.pdf
  snap2pdf --src urls.csv

  # Pipe a CSV in, name the output
  cat urls.csv | snap2pdf --dst reading-list.pdf

  # Remote list, persistent cache directory, four workers
  snap2pdf --src https://example.com/list.csv --temp ./cache --workers 4

  # Re-run against the same cache: only missing artifacts are regenerated
  snap2pdf --src urls.csv --temp ./cache

  # Bind whatever the cache holds, in filename order
  snap2pdf --src urls.csv --temp ./cache --merge-order directory

  # Machine-readable stats
  snap2pdf --src urls.csv --json

EXTERNAL TOOLS (must be on PATH):
  shot-scraper   screenshot capture     pip install shot-scraper
  convert        image → PDF            ImageMagick
  pdftk          PDF concatenation      pdftk-java or pdftk

ENVIRONMENT VARIABLES:
  Every flag can be set via SNAP2PDF_<FLAG>, e.g.:
  SNAP2PDF_SRC, SNAP2PDF_DST, SNAP2PDF_TEMP, SNAP2PDF_WORKERS,
  SNAP2PDF_SELECTOR, SNAP2PDF_MERGE_ORDER

WORKING DIRECTORY LAYOUT:
  <md5(url)>.png   screenshot          } presence of a file is the only
  <md5(url)>.pdf   single-page PDF     } cache signal — delete to redo
"#;

/// Screenshot a list of URLs and bind the shots into a single PDF.
#[derive(Parser, Debug)]
#[command(
    name = "snap2pdf",
    version,
    about = "Screenshot a list of URLs and bind the shots into a single PDF",
    long_about = "Read a CSV of URLs, screenshot each one via shot-scraper, convert each shot \
to a single-page PDF via ImageMagick, and concatenate the pages with pdftk. The working \
directory doubles as a cache: artifacts that already exist are never regenerated.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// URL list: CSV file path, HTTP(S) URL, or '-' for stdin.
    #[arg(long, env = "SNAP2PDF_SRC", default_value = "-")]
    src: String,

    /// Destination path for the merged PDF.
    #[arg(long, env = "SNAP2PDF_DST", default_value = "output.pdf")]
    dst: PathBuf,

    /// Working directory for intermediates; doubles as a persistent cache.
    /// A fresh temporary directory is created (and kept) if omitted.
    #[arg(long, env = "SNAP2PDF_TEMP")]
    temp: Option<PathBuf>,

    /// Number of concurrent URL jobs.
    #[arg(short, long, env = "SNAP2PDF_WORKERS", default_value_t = 10)]
    workers: usize,

    /// Name of the CSV column holding the URLs.
    #[arg(long, env = "SNAP2PDF_COLUMN", default_value = "url")]
    column: String,

    /// CSS selector the screenshot tool captures.
    #[arg(long, env = "SNAP2PDF_SELECTOR", default_value = "#content")]
    selector: String,

    /// Pixel padding around the captured selector.
    #[arg(long, env = "SNAP2PDF_PADDING", default_value_t = 16)]
    padding: u32,

    /// Page order in the bound PDF.
    #[arg(long, env = "SNAP2PDF_MERGE_ORDER", value_enum, default_value = "input")]
    merge_order: MergeOrderArg,

    /// Screenshot-capture executable.
    #[arg(long, env = "SNAP2PDF_SCREENSHOT_TOOL", default_value = "shot-scraper")]
    screenshot_tool: String,

    /// Image-to-PDF conversion executable.
    #[arg(long, env = "SNAP2PDF_CONVERT_TOOL", default_value = "convert")]
    convert_tool: String,

    /// PDF-concatenation executable.
    #[arg(long, env = "SNAP2PDF_MERGE_TOOL", default_value = "pdftk")]
    merge_tool: String,

    /// Download timeout for a remote --src, in seconds.
    #[arg(long, env = "SNAP2PDF_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Suppress log output.
    #[arg(short, long, env = "SNAP2PDF_SILENT")]
    silent: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SNAP2PDF_VERBOSE")]
    verbose: bool,

    /// Disable the progress bar.
    #[arg(long, env = "SNAP2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Print run stats as JSON on stdout.
    #[arg(long, env = "SNAP2PDF_JSON")]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum MergeOrderArg {
    /// URL-list order (default).
    Input,
    /// Lexicographic `*.pdf` order in the working directory.
    Directory,
}

impl From<MergeOrderArg> for MergeOrder {
    fn from(v: MergeOrderArg) -> Self {
        match v {
            MergeOrderArg::Input => MergeOrder::Input,
            MergeOrderArg::Directory => MergeOrder::Directory,
        }
    }
}

/// Resolve once Ctrl-C (or SIGTERM on unix) arrives.
async fn interrupt_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.silent && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.silent || show_progress {
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

    // ── Cancellation wiring ──────────────────────────────────────────────
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            interrupt_signal().await;
            tracing::warn!("interrupt received, stopping in-flight tools");
            cancel.cancel();
        });
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn RunProgressCallback>)
    } else {
        None
    };

    let mut builder = RunConfig::builder()
        .src(&cli.src)
        .dst(&cli.dst)
        .workers(cli.workers)
        .column(&cli.column)
        .selector(&cli.selector)
        .padding(cli.padding)
        .merge_order(cli.merge_order.into())
        .screenshot_tool(&cli.screenshot_tool)
        .convert_tool(&cli.convert_tool)
        .merge_tool(&cli.merge_tool)
        .download_timeout_secs(cli.download_timeout);
    if let Some(ref temp) = cli.temp {
        builder = builder.temp(temp);
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = run(&config, &cancel).await?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise run stats")?
        );
    } else if !cli.silent && !show_progress {
        // The progress callback already printed its own summary line.
        eprintln!(
            "{} urls → {}  ({} shots cached, {} pdfs cached)  {}ms",
            output.stats.urls,
            output.dst.display(),
            output.stats.cached_images,
            output.stats.cached_pdfs,
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}
