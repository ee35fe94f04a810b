//! Generic glue between one [`Reconciler`] and the `neutree-runtime`
//! [`Controller`] that drives it, so `main` only has to supply the
//! reconciler and the store per kind (spec.md §2: "at startup the process
//! instantiates one controller per resource kind, each with N workers").

use std::sync::Arc;

use neutree_controllers::{run_pass, Reconciler};
use neutree_core::{ReconcileError, ResourceKind};
use neutree_runtime::{Action, Context, Controller};
use neutree_store::ResourceStore;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::store_reader::StoreReader;

struct ReconcileCtx<R: Reconciler> {
    reconciler: Arc<R>,
    store: Arc<dyn ResourceStore<R::Spec, R::Status>>,
}

/// Runs `reconciler` against `store` until `cancel` fires, draining
/// in-flight work before returning. Callers spawn one of these per kind.
pub async fn run_kind<R>(
    reconciler: R,
    store: Arc<dyn ResourceStore<R::Spec, R::Status>>,
    kind: ResourceKind,
    config: &Config,
    cancel: CancellationToken,
) where
    R: Reconciler + 'static,
    R::Spec: Send + Sync + 'static,
    R::Status: Send + Sync + 'static,
{
    let reader = Arc::new(StoreReader::new(store.clone(), kind));
    let controller = Controller::new(reader)
        .with_concurrency(config.worker_count)
        .with_resync_period(config.resync_interval);

    let ctx = Context::new(ReconcileCtx {
        reconciler: Arc::new(reconciler),
        store,
    });

    controller
        .run(
            ctx,
            cancel,
            |obj, _trigger, ctx: Context<ReconcileCtx<R>>| async move {
                run_pass(ctx.reconciler.as_ref(), ctx.store.as_ref(), obj).await
            },
            move |err: &ReconcileError, key, _ctx| {
                tracing::warn!(kind = ?kind, %key, %err, "reconcile failed, relying on next resync");
                Action::await_change()
            },
        )
        .await;
}
