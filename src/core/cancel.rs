//! Cooperative cancellation for long-running operations.
//!
//! A [`CancelToken`] is handed to the history walker, which checks it once per
//! revision. Clones share the same flag, so any holder (a signal handler, a UI
//! thread) can stop the walk.

use crate::core::error::{RevCacheError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Sticky: the token never resets.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Yield point: fail with [`RevCacheError::Cancelled`] once cancelled
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(RevCacheError::Cancelled)
        } else {
            Ok(())
        }
    }
}
