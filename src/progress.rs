//! Progress-callback trait for per-job run events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events
//! as the runner works through the URL list.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a log sink, or a terminal progress bar
//! without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` because jobs complete
//! concurrently and out of input order.

use std::sync::Arc;

/// Called by the runner as it processes each URL job.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. When `workers > 1`, the per-job methods may be
/// called concurrently from different tasks; implementations must protect
/// shared mutable state themselves.
pub trait RunProgressCallback: Send + Sync {
    /// Called once before any job starts, with the URL count.
    fn on_run_start(&self, total_jobs: usize) {
        let _ = total_jobs;
    }

    /// Called just before a URL job begins its cache probe.
    fn on_job_start(&self, url: &str) {
        let _ = url;
    }

    /// Called when a URL job finishes. `cached` is true when both artifacts
    /// already existed and no tool was invoked.
    fn on_job_complete(&self, url: &str, cached: bool) {
        let _ = (url, cached);
    }

    /// Called when a URL job fails. The whole run aborts right after.
    ///
    /// Takes `String` rather than `&str` so the callback stays object-safe
    /// inside `Send` futures moved across tasks.
    fn on_job_error(&self, url: &str, error: String) {
        let _ = (url, error);
    }

    /// Called once before the merge subprocess starts.
    fn on_merge_start(&self, files: usize) {
        let _ = files;
    }

    /// Called once after the merge succeeds.
    fn on_run_complete(&self, total_jobs: usize, merged_files: usize) {
        let _ = (total_jobs, merged_files);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;
