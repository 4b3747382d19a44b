//! Run results: where the merged PDF landed and what work was done.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// Path of the merged destination PDF.
    pub dst: PathBuf,

    /// Working directory that holds (and caches) the intermediate artifacts.
    pub temp: PathBuf,

    /// Counters for the run.
    pub stats: RunStats,
}

/// Counters describing how much work a run actually performed.
///
/// `captured + cached_images == urls` and likewise for the PDF side; the
/// cached counters are what make the skip-if-exists behaviour observable
/// from the outside.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// URLs read from the source column.
    pub urls: usize,

    /// Screenshots actually taken this run.
    pub captured: usize,

    /// Screenshot invocations skipped because the image already existed.
    pub cached_images: usize,

    /// Image-to-PDF conversions actually performed this run.
    pub converted: usize,

    /// Conversions skipped because the per-URL PDF already existed.
    pub cached_pdfs: usize,

    /// Files handed to the concatenation tool.
    pub merged_files: usize,

    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
}
