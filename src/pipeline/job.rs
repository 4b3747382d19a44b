//! Per-URL job: hash-named artifacts, cache probe, screenshot, convert.
//!
//! ## The filesystem is the cache
//!
//! A job's two artifacts are named by the md5 of the URL string, so the same
//! URL always maps to the same files and concurrent jobs can never collide.
//! Presence of a file is the only cache-hit signal — there is no content
//! validation and no expiry. A half-written artifact from a killed run will
//! be trusted on the next one; delete the working directory to force a full
//! rebuild. This is a deliberately weak invalidation policy, kept because it
//! makes resuming an interrupted batch free.

use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::error::Snap2PdfError;
use crate::pipeline::exec::{self, ToolIo};
use std::path::Path;
use tracing::{debug, info};

/// Artifact filenames for one URL, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Screenshot image: `<md5-hex>.png`
    pub image: String,
    /// Single-page PDF: `<md5-hex>.pdf`
    pub pdf: String,
}

/// Derive the content-addressed artifact names for a URL.
///
/// Deterministic and stable across runs and platforms: the digest is over
/// the exact URL bytes, no normalisation.
pub fn artifacts_for(url: &str) -> Artifacts {
    let digest = md5::compute(url.as_bytes());
    Artifacts {
        image: format!("{digest:x}.png"),
        pdf: format!("{digest:x}.pdf"),
    }
}

/// What a finished job did for each of its two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The tool was invoked and exited zero.
    Ran,
    /// The artifact already existed; the tool was not invoked.
    Cached,
}

/// Result of one successful URL job.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub url: String,
    pub image: StepOutcome,
    pub pdf: StepOutcome,
}

impl JobOutcome {
    /// True when no tool was invoked at all.
    pub fn fully_cached(&self) -> bool {
        self.image == StepOutcome::Cached && self.pdf == StepOutcome::Cached
    }
}

/// Existence probe that distinguishes "not there" from real stat failures.
fn artifact_exists(path: &Path) -> Result<bool, Snap2PdfError> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Snap2PdfError::Stat {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Run one URL end to end: screenshot it, then convert the shot to a PDF.
///
/// Both steps skip themselves when their artifact already exists. The first
/// tool failure is fatal for the job and carries the URL and filename.
/// There is no per-step retry; a flaky screenshot host fails the batch and
/// the re-run resumes from whatever was already written.
pub async fn build_pdf(
    url: &str,
    workdir: &Path,
    config: &RunConfig,
    cancel: &CancelToken,
) -> Result<JobOutcome, Snap2PdfError> {
    if cancel.is_cancelled() {
        return Err(Snap2PdfError::Cancelled);
    }

    let artifacts = artifacts_for(url);

    let image = if artifact_exists(&workdir.join(&artifacts.image))? {
        debug!("have {}", artifacts.image);
        StepOutcome::Cached
    } else {
        info!("shoot {} from {:?}", artifacts.image, url);
        let padding = config.padding.to_string();
        let args = [
            "--reduced-motion",
            "-s",
            &config.selector,
            "-p",
            &padding,
            "--output",
            &artifacts.image,
            url,
        ];
        let status = exec::run_tool(
            &config.screenshot_tool,
            &args,
            Some(workdir),
            ToolIo::Inherit,
            cancel,
        )
        .await?;
        if !status.success() {
            return Err(Snap2PdfError::ScreenshotFailed {
                url: url.to_string(),
                file: artifacts.image,
                status,
            });
        }
        StepOutcome::Ran
    };

    let pdf = if artifact_exists(&workdir.join(&artifacts.pdf))? {
        debug!("have {}", artifacts.pdf);
        StepOutcome::Cached
    } else {
        let args = [artifacts.image.as_str(), artifacts.pdf.as_str()];
        let status = exec::run_tool(
            &config.convert_tool,
            &args,
            Some(workdir),
            ToolIo::Null,
            cancel,
        )
        .await?;
        if !status.success() {
            return Err(Snap2PdfError::ConvertFailed {
                url: url.to_string(),
                file: artifacts.pdf,
                status,
            });
        }
        StepOutcome::Ran
    };

    debug!("done {} from {:?}", artifacts.pdf, url);
    Ok(JobOutcome {
        url: url.to_string(),
        image,
        pdf,
    })
}
