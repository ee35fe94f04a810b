use std::time::Duration;

/// What the controller should do after a reconcile attempt completes
/// successfully (spec.md §2: "requeues itself" / resync cadence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    requeue_after: Option<Duration>,
}

impl Action {
    /// Re-run reconciliation after `duration`, regardless of whether any
    /// further store change is observed in the meantime. Used for polling
    /// external state (cluster health, model registry sync) and as the
    /// steady-state resync fallback.
    #[must_use]
    pub fn requeue(duration: Duration) -> Self {
        Self {
            requeue_after: Some(duration),
        }
    }

    /// Don't requeue; wait for the next resync sweep or an explicit
    /// re-enqueue (e.g. a dependent object's reconcile touching this ref).
    #[must_use]
    pub fn await_change() -> Self {
        Self { requeue_after: None }
    }

    pub fn requeue_after(&self) -> Option<Duration> {
        self.requeue_after
    }
}
