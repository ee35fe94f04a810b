use std::sync::Arc;
use std::time::Duration;

use neutree_core::ObjectRef;

/// Observability extension point a `neutree-controller-manager` binary can
/// plug in without `neutree-runtime` depending on a metrics crate directly
/// (the workspace has no metrics crate to ground one in — see DESIGN.md).
///
/// Both methods default to a no-op `Ok(())` so tests and small binaries can
/// ignore this entirely. Returning `Err` aborts the current work item
/// (spec.md §4.1: "any hook returning error aborts this item and leaves its
/// rate-limit state alone") — the key is released back to the queue without
/// touching its backoff state, so it is retried exactly as if nothing had
/// run at all.
pub trait ReconcileHooks: Send + Sync {
    fn before_reconcile(&self, _key: &ObjectRef) -> Result<(), String> {
        Ok(())
    }

    fn after_reconcile(
        &self,
        _key: &ObjectRef,
        _outcome: &super::controller::ReconcileOutcome,
        _elapsed: Duration,
    ) -> Result<(), String> {
        Ok(())
    }
}

/// Hooks that only emit `tracing` events, matching the rest of the
/// workspace's "structured logging, no metrics backend" posture.
pub struct TracingHooks;

impl ReconcileHooks for TracingHooks {
    fn before_reconcile(&self, key: &ObjectRef) -> Result<(), String> {
        tracing::debug!(%key, "reconciling");
        Ok(())
    }

    fn after_reconcile(
        &self,
        key: &ObjectRef,
        outcome: &super::controller::ReconcileOutcome,
        elapsed: Duration,
    ) -> Result<(), String> {
        match outcome {
            super::controller::ReconcileOutcome::Success(action) => {
                tracing::debug!(%key, ?elapsed, requeue_after = ?action.requeue_after(), "reconcile succeeded");
            }
            super::controller::ReconcileOutcome::Failed => {
                tracing::warn!(%key, ?elapsed, "reconcile failed, backing off");
            }
        }
        Ok(())
    }
}

/// A registration-ordered list of [`ReconcileHooks`] (spec.md §4.1: "two
/// hook lists... run in registration order"). Every registered hook's
/// `before_reconcile` runs, in order, before the reconcile is invoked; every
/// hook's `after_reconcile` runs, in order, once it returns. The first hook
/// to return an error short-circuits the remaining hooks in that pass.
pub struct HookList(Vec<Arc<dyn ReconcileHooks>>);

impl HookList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn register(mut self, hook: Arc<dyn ReconcileHooks>) -> Self {
        self.0.push(hook);
        self
    }

    pub fn before_reconcile(&self, key: &ObjectRef) -> Result<(), String> {
        for hook in &self.0 {
            hook.before_reconcile(key)?;
        }
        Ok(())
    }

    pub fn after_reconcile(
        &self,
        key: &ObjectRef,
        outcome: &super::controller::ReconcileOutcome,
        elapsed: Duration,
    ) -> Result<(), String> {
        for hook in &self.0 {
            hook.after_reconcile(key, outcome, elapsed)?;
        }
        Ok(())
    }
}

impl Default for HookList {
    fn default() -> Self {
        Self::new().register(Arc::new(TracingHooks))
    }
}

pub type SharedHooks = Arc<HookList>;
