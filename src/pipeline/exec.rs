//! Shared subprocess runner for the three external tools.
//!
//! ## Why one choke point?
//!
//! Every tool invocation needs the same treatment: spawn with
//! `kill_on_drop` so an abandoned job future reaps its child, wait
//! concurrently with the cancellation token, and map a missing binary to an
//! actionable error instead of a bare "No such file or directory". Funnelling
//! screenshot, convert, and merge through one function keeps those rules in
//! one place.

use crate::cancel::CancelToken;
use crate::error::Snap2PdfError;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

/// How the child's stdout/stderr are wired.
///
/// The screenshot and merge tools are chatty in useful ways (browser errors,
/// pdftk warnings) and inherit the parent's streams; the image conversion is
/// silent on success and gets the bit bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolIo {
    Inherit,
    Null,
}

/// Spawn `tool` with `args` and wait for it, honouring `cancel`.
///
/// Returns the child's exit status; callers decide what a non-zero status
/// means in their context. On cancellation the child is killed and
/// [`Snap2PdfError::Cancelled`] is returned; anything the child already
/// wrote to disk stays there.
pub async fn run_tool(
    tool: &str,
    args: &[&str],
    cwd: Option<&Path>,
    io: ToolIo,
    cancel: &CancelToken,
) -> Result<ExitStatus, Snap2PdfError> {
    let (stdout, stderr) = match io {
        ToolIo::Inherit => (Stdio::inherit(), Stdio::inherit()),
        ToolIo::Null => (Stdio::null(), Stdio::null()),
    };

    let mut cmd = Command::new(tool);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    debug!("exec {} {:?}", tool, args);

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Snap2PdfError::ToolNotFound {
                tool: tool.to_string(),
            }
        } else {
            Snap2PdfError::ToolSpawn {
                tool: tool.to_string(),
                source: e,
            }
        }
    })?;

    tokio::select! {
        status = child.wait() => status.map_err(|e| Snap2PdfError::ToolSpawn {
            tool: tool.to_string(),
            source: e,
        }),
        _ = cancel.cancelled() => {
            // Kill and reap; intermediate files written so far are kept.
            child.kill().await.ok();
            Err(Snap2PdfError::Cancelled)
        }
    }
}
