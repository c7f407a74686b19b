//! Per-invocation engine context.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Caller-owned context passed to every engine call.
///
/// Cancelling the context aborts an in-flight call. Cancellation is
/// all-or-nothing: a cancelled call returns no reports.
#[derive(Debug, Clone, Default)]
pub struct EngineContext {
    cancellation: CancellationToken,
}

impl EngineContext {
    /// Create a context with a fresh cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every call using this context or a clone of it.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Return whether the context has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Wait until the context is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancellation.cancelled()
    }
}
