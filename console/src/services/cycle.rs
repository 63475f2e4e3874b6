//! Fetch-cycle tracking for recomputable views
//!
//! Each analytics view owns one [`RecomputeGuard`]. Every parameter
//! change begins a new cycle; results from an earlier cycle arriving
//! late must not overwrite the state of the current one. Closing the
//! guard (view teardown) invalidates all cycles at once.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct GuardInner {
    current: AtomicU64,
    closed: AtomicBool,
}

/// Generation counter shared by all in-flight recomputations of a view
#[derive(Debug, Clone, Default)]
pub struct RecomputeGuard {
    inner: Arc<GuardInner>,
}

/// Handle identifying one recomputation cycle
#[derive(Debug, Clone)]
pub struct CycleToken {
    id: u64,
    inner: Arc<GuardInner>,
}

impl RecomputeGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle, superseding every cycle begun before it
    pub fn begin(&self) -> CycleToken {
        let id = self.inner.current.fetch_add(1, Ordering::SeqCst) + 1;
        CycleToken {
            id,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Invalidate all cycles permanently. Called on view teardown so
    /// that responses landing afterwards are discarded.
    pub fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

impl CycleToken {
    /// Whether this cycle is still the latest one and the view is still
    /// alive. Checked after every await point that produces state.
    pub fn is_current(&self) -> bool {
        !self.inner.closed.load(Ordering::SeqCst)
            && self.inner.current.load(Ordering::SeqCst) == self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_cycle_supersedes_older() {
        let guard = RecomputeGuard::new();
        let first = guard.begin();
        assert!(first.is_current());
        let second = guard.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn shutdown_invalidates_all_cycles() {
        let guard = RecomputeGuard::new();
        let token = guard.begin();
        guard.shutdown();
        assert!(!token.is_current());
        assert!(!guard.begin().is_current());
    }
}
