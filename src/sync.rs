//! Synchronization primitives for search control.
//!
//! Provides the [`Timer`] collaborator interface the search polls, and a
//! plain shared stop flag implementing it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Search cancellation collaborator.
///
/// The search only ever calls [`Timer::should_stop`], once per node. Whoever
/// owns the timer calls [`Timer::start`] before the search and may call
/// [`Timer::stop`] from any thread to cancel it.
pub trait Timer: Send + Sync {
    /// Begin measuring the budget
    fn start(&self);

    /// Whether the search must give up now
    fn should_stop(&self) -> bool;

    /// Trip the timer immediately
    fn stop(&self);
}

/// A thread-safe stop flag for controlling search termination.
///
/// This wraps `Arc<AtomicBool>`; clones share the same flag. As a [`Timer`]
/// it never trips on its own, only when someone calls `stop`.
#[derive(Clone, Debug)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// Create a new stop flag (initially not stopped).
    #[must_use]
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }

    /// Create a stop flag that is already set.
    #[must_use]
    pub fn stopped() -> Self {
        StopFlag(Arc::new(AtomicBool::new(true)))
    }

    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Clear the stop flag.
    #[inline]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Arc<AtomicBool>> for StopFlag {
    fn from(arc: Arc<AtomicBool>) -> Self {
        StopFlag(arc)
    }
}

impl Timer for StopFlag {
    /// Re-arms the flag for a new search
    fn start(&self) {
        self.reset();
    }

    fn should_stop(&self) -> bool {
        self.is_stopped()
    }

    fn stop(&self) {
        self.set();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_flag_lifecycle() {
        let flag = StopFlag::new();
        assert!(!flag.should_stop());

        flag.stop();
        assert!(flag.should_stop());

        flag.start();
        assert!(!flag.should_stop());
    }

    #[test]
    fn test_stop_flag_clone() {
        let flag1 = StopFlag::new();
        let flag2 = flag1.clone();

        flag1.stop();
        assert!(flag2.is_stopped());
    }

    #[test]
    fn test_stop_flag_stopped() {
        let flag = StopFlag::stopped();
        assert!(flag.is_stopped());
    }

    #[test]
    fn test_stop_flag_from_shared_atomic() {
        let raw = Arc::new(AtomicBool::new(false));
        let flag = StopFlag::from(Arc::clone(&raw));
        raw.store(true, Ordering::Relaxed);
        assert!(flag.should_stop());
    }
}
