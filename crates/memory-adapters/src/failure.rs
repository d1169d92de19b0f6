//! Transient-failure injection shared by the adapters.

use std::sync::atomic::{AtomicU32, Ordering};

/// Counts down injected transient failures.
#[derive(Debug, Default)]
pub(crate) struct FailureInjector {
    remaining: AtomicU32,
}

impl FailureInjector {
    /// Make the next `n` operations fail transiently.
    pub(crate) fn fail_next(&self, n: u32) {
        self.remaining.store(n, Ordering::SeqCst);
    }

    /// Consume one injected failure, if any remain.
    pub(crate) fn take(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}
