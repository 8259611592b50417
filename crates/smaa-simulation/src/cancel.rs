//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag checked by simulations between chunks.
///
/// Clones share the same flag, so a clone kept by the caller cancels a run
/// that owns another.
///
/// # Example
///
/// ```
/// use smaa_simulation::CancelFlag;
///
/// let flag = CancelFlag::new();
/// let remote = flag.clone();
/// remote.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Takes effect at the next chunk boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears the flag so the owning simulation can run again.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
