//! The per-kind reconciler contract (spec.md §4.2) and the generic pass
//! dispatcher every kind runs through.
//!
//! `Reconciler::handle_deletion`/`handle_normal` generalize
//! `kube_runtime::finalizer`'s `Event::Cleanup`/`Event::Apply` split: where
//! Kubernetes needs a finalizer string in `metadata.finalizers` to hold the
//! object open for cleanup, this system's own `deletion_timestamp`-gated
//! dispatch already does that job, so there is no finalizer bookkeeping to
//! port — only the two-branch *shape* of `finalizer`'s dispatch survives
//! (SPEC_FULL.md §4.2).
//!
//! Both methods always return `Ok(PassOutcome)`: a kind's own external-call
//! errors are captured into the candidate status's `error_message`
//! (spec.md §7's "a reconciler returns at most one error per pass... the
//! deferred status-update captures it"), never propagated past the
//! reconciler boundary. The `Err` path of [`run_pass`] is reserved for
//! failures of the write itself (the store rejecting the status/delete
//! call), which the controller's queue legitimately should back off and
//! retry.

use async_trait::async_trait;
use neutree_core::{Object, ReconcileError, ResourceKind};
use neutree_runtime::Action;
use neutree_store::{ResourceStore, StoreError};

use crate::status::write_status;

/// What a single `handle_deletion`/`handle_normal` pass produced: the
/// candidate status to (maybe) write, and whether the row should now be
/// physically removed (spec.md §3 invariant 2: "the row is physically
/// removed only on the next reconcile after the reconciler observes
/// `phase=DELETED`").
pub struct PassOutcome<Status> {
    pub status: Status,
    pub delete_row: bool,
}

impl<Status> PassOutcome<Status> {
    pub fn status(status: Status) -> Self {
        Self {
            status,
            delete_row: false,
        }
    }

    pub fn status_and_delete(status: Status) -> Self {
        Self {
            status,
            delete_row: true,
        }
    }
}

#[async_trait]
pub trait Reconciler: Send + Sync {
    type Spec: Send + Sync;
    type Status: Send + Sync + PartialEq + Clone + Default;

    fn kind(&self) -> ResourceKind;

    /// `obj.metadata.deletion_timestamp` is set (spec.md §4.2).
    async fn handle_deletion(
        &self,
        obj: &Object<Self::Spec, Self::Status>,
    ) -> PassOutcome<Self::Status>;

    /// `obj.metadata.deletion_timestamp` is unset (spec.md §4.2).
    async fn handle_normal(&self, obj: &Object<Self::Spec, Self::Status>) -> PassOutcome<Self::Status>;
}

/// Dispatches one reconcile pass (spec.md §4.2's `sync(obj)` shape),
/// writes the resulting status through the debounce in
/// [`crate::status::write_status`], and performs the physical row delete
/// a pass may request — the "deferred status write" design note (spec.md
/// §9) expressed as an explicit wrapper rather than a scope guard, since
/// Rust has no destructor-based early-return hook as ergonomic as Go's
/// `defer` for this shape.
pub async fn run_pass<R: Reconciler>(
    reconciler: &R,
    store: &dyn ResourceStore<R::Spec, R::Status>,
    obj: Object<R::Spec, R::Status>,
) -> Result<Action, ReconcileError> {
    let outcome = if obj.metadata.is_deleting() {
        reconciler.handle_deletion(&obj).await
    } else {
        reconciler.handle_normal(&obj).await
    };

    write_status(store, &obj.id, &obj.status, outcome.status)
        .await
        .map_err(ReconcileError::from)?;

    if outcome.delete_row {
        match store.delete(&obj.id).await {
            Ok(()) | Err(StoreError::NotFound) => {}
            Err(err) => return Err(err.into()),
        }
    }

    Ok(Action::await_change())
}

/// Shared helper every `handle_deletion` reaches for first (spec.md §4.2
/// step 1): once the prior pass already landed the kind's terminal
/// phase(s), the only remaining work is the physical delete.
pub fn is_delete_terminal<Phase: PartialEq>(phase: &Phase, terminal: &[Phase]) -> bool {
    terminal.iter().any(|t| t == phase)
}
