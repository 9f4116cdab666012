//! Request cancellation
//!
//! Blocking work (extraction, rendering, PDF serialization) runs on the
//! blocking pool and cannot be dropped like a future. Each request owns a
//! [`CancellationFlag`]; the handler holds a [`CancelOnDrop`] guard so that a
//! client disconnect, which drops the handler future, flips the flag and the
//! blocking work stops at its next checkpoint.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag for one request
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the request as abandoned
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether the request has been abandoned
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Guard that cancels this flag when dropped
    pub fn guard(&self) -> CancelOnDrop {
        CancelOnDrop {
            flag: Some(self.clone()),
        }
    }
}

/// Cancels its flag on drop unless disarmed
#[derive(Debug)]
pub struct CancelOnDrop {
    flag: Option<CancellationFlag>,
}

impl CancelOnDrop {
    /// Completed normally; do not cancel
    pub fn disarm(mut self) {
        self.flag = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(flag) = self.flag.take() {
            tracing::debug!("Request dropped before completion, cancelling blocking work");
            flag.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_cancels_on_drop() {
        let flag = CancellationFlag::new();
        {
            let _guard = flag.guard();
            assert!(!flag.is_cancelled());
        }
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_disarmed_guard_leaves_flag() {
        let flag = CancellationFlag::new();
        flag.guard().disarm();
        assert!(!flag.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = CancellationFlag::new();
        let other = flag.clone();
        other.cancel();
        assert!(flag.is_cancelled());
    }
}
