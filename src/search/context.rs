//! Cooperative cancellation for searches.
//!
//! Evaluation is synchronous and CPU-bound, so a [`SearchContext`] is polled
//! rather than awaited: the executor checks it before every query node and
//! every few hundred terms of a dictionary scan. Checks are plain atomic
//! loads, so any number of concurrent searches can share one token.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{CmdexError, Result};

/// A cloneable flag that aborts every search holding a clone of it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Searches observe it at their next check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Per-search context carrying an optional cancellation token and deadline.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl SearchContext {
    /// A context that never aborts.
    pub fn background() -> Self {
        Self::default()
    }

    /// Abort when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Abort once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Abort once `timeout` has elapsed from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Return an error if the search should stop.
    pub fn check(&self) -> Result<()> {
        if let Some(token) = &self.token
            && token.is_cancelled()
        {
            return Err(CmdexError::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(CmdexError::DeadlineExceeded);
        }
        Ok(())
    }
}
