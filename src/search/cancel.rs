//! Cooperative cancellation for background searches

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag handed to a search.
///
/// Clones observe the same flag. The search polls it once per top-level
/// candidate; nothing is interrupted preemptively.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    stopped: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this token to stop
    #[inline]
    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Both handles share one flag
    #[inline]
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.stopped, &other.stopped)
    }
}
