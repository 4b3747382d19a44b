//! Top-level run orchestration: load, fan out, merge.
//!
//! ## Failure semantics
//!
//! The batch is fail-fast with no partial-success mode: the first job error
//! is returned and the destination file is never written. Dropping the job
//! stream tears down in-flight futures, and because every child process is
//! spawned with `kill_on_drop`, their subprocesses go with them. Artifacts
//! already written stay on disk, so a re-run resumes where the failed one
//! stopped.

use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::error::Snap2PdfError;
use crate::output::{RunOutput, RunStats};
use crate::pipeline::job::StepOutcome;
use crate::pipeline::{job, merge, source};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Execute one full run: read URLs, build per-URL PDFs with bounded
/// concurrency, concatenate them into `config.dst`.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Any failure is fatal: input errors abort before the first tool launch,
/// the first job error aborts the batch, and a merge error aborts the run.
/// See [`Snap2PdfError`] for the full taxonomy.
pub async fn run(config: &RunConfig, cancel: &CancelToken) -> Result<RunOutput, Snap2PdfError> {
    let start = Instant::now();

    // ── Step 1: Load the URL list ────────────────────────────────────────
    let urls = source::load_urls(config).await?;
    if urls.is_empty() {
        return Err(Snap2PdfError::NoUrls {
            column: config.column.clone(),
        });
    }
    info!("loaded {} urls", urls.len());

    // ── Step 2: Resolve the working directory ────────────────────────────
    let workdir = resolve_workdir(config)?;
    info!("working directory {:?}", workdir);

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(urls.len());
    }

    // ── Step 3: Bounded concurrent fetch-and-convert ─────────────────────
    let mut stats = RunStats {
        urls: urls.len(),
        ..RunStats::default()
    };

    {
        let mut jobs = stream::iter(urls.iter().map(|url| {
            let workdir = workdir.clone();
            async move {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_job_start(url);
                }
                let result = job::build_pdf(url, &workdir, config, cancel).await;
                if let Some(ref cb) = config.progress_callback {
                    match &result {
                        Ok(outcome) => cb.on_job_complete(url, outcome.fully_cached()),
                        Err(e) => cb.on_job_error(url, e.to_string()),
                    }
                }
                result
            }
        }))
        .buffer_unordered(config.workers);

        while let Some(result) = jobs.next().await {
            // Fail fast: returning drops `jobs`, which cancels queued
            // futures and kills in-flight children.
            let outcome = result?;
            match outcome.image {
                StepOutcome::Ran => stats.captured += 1,
                StepOutcome::Cached => stats.cached_images += 1,
            }
            match outcome.pdf {
                StepOutcome::Ran => stats.converted += 1,
                StepOutcome::Cached => stats.cached_pdfs += 1,
            }
        }
    }

    // ── Step 4: Merge ────────────────────────────────────────────────────
    let pdfs = merge::collect_pdfs(&urls, &workdir, config.merge_order)?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_merge_start(pdfs.len());
    }
    stats.merged_files = merge::merge(&pdfs, &workdir, config, cancel).await?;
    stats.total_duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "run complete: {} urls, {} captured, {} cached, {}ms",
        stats.urls, stats.captured, stats.cached_images, stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(stats.urls, stats.merged_files);
    }

    Ok(RunOutput {
        dst: config.dst.clone(),
        temp: workdir,
        stats,
    })
}

/// Use the configured working directory (created if missing) or mint a fresh
/// temporary one.
///
/// A minted directory is deliberately kept after the run, matching the
/// supplied-directory behaviour: the path is logged and can be reused as a
/// cache via `--temp` on the next invocation.
fn resolve_workdir(config: &RunConfig) -> Result<PathBuf, Snap2PdfError> {
    match &config.temp {
        Some(path) => {
            std::fs::create_dir_all(path).map_err(|e| Snap2PdfError::WorkingDir {
                path: path.clone(),
                source: e,
            })?;
            Ok(path.clone())
        }
        None => {
            let dir = tempfile::TempDir::with_prefix("snap2pdf-").map_err(|e| {
                Snap2PdfError::WorkingDir {
                    path: std::env::temp_dir(),
                    source: e,
                }
            })?;
            Ok(dir.keep())
        }
    }
}
