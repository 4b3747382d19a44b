//! Interrupt-driven cancellation for workers and subprocesses.
//!
//! Cancellation is an explicit value rather than a process-global signal
//! handler: a [`CancelToken`] is created by the caller, cloned into every
//! worker, and checked at each blocking point —
//! before a job starts and while waiting on a spawned tool. The CLI wires the
//! token to Ctrl-C/SIGTERM; library users can trigger it from anywhere.
//!
//! Built on a tokio `watch` channel so `cancelled().await` wakes every waiter
//! at once without polling.

use tokio::sync::watch;

/// A cloneable cancellation token.
///
/// All clones observe the same flag; cancelling any clone cancels them all.
/// Cancellation is one-way and permanent for the lifetime of the token.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: std::sync::Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Create a fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
        }
    }

    /// Flip the token to cancelled, waking every `cancelled().await`.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Non-blocking check, used before starting new work.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the token is cancelled. Pends forever otherwise, which is
    /// exactly what `tokio::select!` against a child process wait needs.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives inside every clone of the token, so wait_for can
        // only fail if all tokens are gone — in which case nobody is left to
        // observe the result anyway.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
