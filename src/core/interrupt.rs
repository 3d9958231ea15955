//! Cooperative SIGINT handling.
//!
//! The handler only trips a [`CancellationToken`]. Commands call
//! [`CancellationToken::checkpoint`] between steps and unwind with
//! `Error::Interrupted`, so secrets held in zeroizing containers are dropped
//! the normal way and temp files are removed by their guards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};

/// Shared interrupt flag for one command run.
///
/// Clones share state; the SIGINT handler owns one and the [`Vault`]
/// doing the work owns another.
///
/// [`Vault`]: crate::core::vault::Vault
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,
    prompting: AtomicBool,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Abort the current command if cancellation has been requested.
    ///
    /// # Errors
    ///
    /// Returns `Error::Interrupted`.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Interrupted);
        }
        Ok(())
    }

    /// Mark a blocking prompt as active until the guard drops.
    pub fn prompting(&self) -> PromptGuard<'_> {
        self.inner.prompting.store(true, Ordering::SeqCst);
        PromptGuard(self)
    }

    fn is_prompting(&self) -> bool {
        self.inner.prompting.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Returned by [`CancellationToken::prompting`].
pub struct PromptGuard<'a>(&'a CancellationToken);

impl Drop for PromptGuard<'_> {
    fn drop(&mut self) {
        self.0.inner.prompting.store(false, Ordering::SeqCst);
    }
}

/// Install the SIGINT handler, tripping `token`.
pub fn install(token: &CancellationToken) {
    let token = token.clone();
    let installed = ctrlc::set_handler(move || {
        token.cancel();
        if token.is_prompting() {
            eprintln!("\ninterrupted: press Enter to abort");
        } else {
            eprintln!("\ninterrupted: cleaning up");
        }
    });
    if let Err(e) = installed {
        debug!(error = %e, "interrupt handler not installed");
    }
}
