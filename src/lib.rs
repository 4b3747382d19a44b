//! # snap2pdf
//!
//! Screenshot a list of URLs and bind the shots into a single PDF.
//!
//! ## Why this crate?
//!
//! "Print to PDF" flattens a page's layout through a print stylesheet,
//! which many sites never test. Screenshotting the rendered page instead
//! preserves exactly what a reader sees, and binding one shot per URL gives
//! an archival document for a reading list, a clipping collection, or a
//! set of receipts. All of the heavy lifting is delegated to battle-tested
//! external tools; this crate is the orchestration around them.
//!
//! ## Pipeline Overview
//!
//! ```text
//! CSV (url column)
//!  │
//!  ├─ 1. Source  read the list from a file, URL, or stdin
//!  ├─ 2. Jobs    N workers: shot-scraper → <md5>.png, convert → <md5>.pdf
//!  │             (skip-if-exists: the working directory is the cache)
//!  └─ 3. Merge   pdftk <pdfs…> cat output dst, in input order
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snap2pdf::{run, CancelToken, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::builder()
//!         .src("urls.csv")
//!         .dst("bound.pdf")
//!         .workers(4)
//!         .build()?;
//!     let output = run(&config, &CancelToken::new()).await?;
//!     eprintln!(
//!         "{} urls → {} ({} cached)",
//!         output.stats.urls,
//!         output.dst.display(),
//!         output.stats.cached_images
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## External tools
//!
//! | Step | Default binary | Override |
//! |------|----------------|----------|
//! | Screenshot | `shot-scraper` | [`RunConfigBuilder::screenshot_tool`] |
//! | Image → PDF | `convert` (ImageMagick) | [`RunConfigBuilder::convert_tool`] |
//! | Concatenate | `pdftk` | [`RunConfigBuilder::merge_tool`] |
//!
//! All three must be on `PATH` (or pointed at explicitly). Nothing is
//! bundled or downloaded.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `snap2pdf` binary (clap + anyhow + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! snap2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cancel;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cancel::CancelToken;
pub use config::{MergeOrder, RunConfig, RunConfigBuilder};
pub use error::Snap2PdfError;
pub use output::{RunOutput, RunStats};
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use run::run;
