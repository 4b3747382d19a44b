//! Error types for the snap2pdf library.
//!
//! The error taxonomy follows the run's phases:
//!
//! * **Input errors** — the URL list could not be read or lacks the requested
//!   column. These abort the run before any external tool is launched.
//! * **Job errors** — one of the two per-URL subprocesses failed. Always
//!   annotated with the offending URL and artifact filename so a failed batch
//!   of hundreds of URLs is diagnosable from the message alone.
//! * **Merge errors** — the final concatenation subprocess failed.
//!
//! There is no non-fatal tier: any job failure aborts the whole run and no
//! destination file is produced. Artifacts already written stay on disk and
//! are picked up as cache hits on the next run.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// All errors returned by the snap2pdf library.
#[derive(Debug, Error)]
pub enum Snap2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The URL-list file was not found at the given path.
    #[error("URL list not found: '{path}'\nCheck the path exists and is readable.")]
    SourceNotFound { path: PathBuf },

    /// The URL-list file exists but could not be read.
    #[error("Failed to read URL list '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote URL-list download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Remote URL-list download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The URL list is not parseable as CSV.
    #[error("Failed to parse URL list as CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV header has no column with the requested name.
    #[error("Column '{column}' not found in CSV header (available: {available:?})")]
    ColumnMissing {
        column: String,
        available: Vec<String>,
    },

    /// The URL list parsed fine but yielded zero URLs.
    #[error("URL list contains no '{column}' values — nothing to do")]
    NoUrls { column: String },

    // ── Working-directory errors ──────────────────────────────────────────
    /// The working directory could not be created.
    #[error("Failed to prepare working directory '{path}': {source}")]
    WorkingDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cache-probe stat failed with something other than "not found".
    #[error("Failed to stat '{path}': {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Job errors ────────────────────────────────────────────────────────
    /// An external tool binary is not on PATH.
    #[error(
        "'{tool}' not found on PATH.\n\
         Install it, or point the matching --*-tool flag at the right binary."
    )]
    ToolNotFound { tool: String },

    /// A tool was found but could not be started or waited on.
    #[error("Failed to run '{tool}': {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The screenshot tool exited non-zero for a URL.
    #[error("problem with '{file}' from '{url}': screenshot tool {status}")]
    ScreenshotFailed {
        url: String,
        file: String,
        status: ExitStatus,
    },

    /// The image-to-PDF tool exited non-zero for a URL.
    #[error("problem with '{file}' from '{url}': convert tool {status}")]
    ConvertFailed {
        url: String,
        file: String,
        status: ExitStatus,
    },

    // ── Merge errors ──────────────────────────────────────────────────────
    /// Directory-order merge found nothing to concatenate.
    #[error("No PDF files found in '{dir}' — nothing to merge")]
    NothingToMerge { dir: PathBuf },

    /// Listing `*.pdf` in the working directory failed.
    #[error("Failed to list PDFs in '{dir}': {detail}")]
    ListPdfs { dir: PathBuf, detail: String },

    /// The PDF-concatenation tool exited non-zero.
    #[error("Failed to merge PDFs into '{dst}': merge tool {status}")]
    MergeFailed { dst: PathBuf, status: ExitStatus },

    // ── Cancellation ──────────────────────────────────────────────────────
    /// The run was interrupted (Ctrl-C / SIGTERM).
    #[error("Run cancelled")]
    Cancelled,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
