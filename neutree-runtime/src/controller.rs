//! The worker pool that drives a reconciler against a [`Reader`] on a
//! schedule: a [`RateLimitingQueue`] feeds a fixed-size `tokio::task::JoinSet`
//! of workers, generalizing `kube_runtime::controller::runner::Runner`'s
//! bounded-concurrency model (kube-runtime/src/controller/runner.rs) to a
//! pull-from-queue shape instead of a stream combinator, plus a resync task
//! that periodically re-lists every [`ObjectRef`] the way
//! `kube_runtime::Controller`'s watch-reflector resync does.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use neutree_core::{Object, ObjectRef};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::context::Context;
use crate::hooks::{HookList, SharedHooks};
use crate::queue::{QueueHandle, RateLimitingQueue};
use crate::reader::{Reader, ReaderError};

#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    Success(Action),
    Failed,
}

/// Handed to reconcilers so they can enqueue a dependent object's ref
/// without reaching back into the controller itself.
pub type TriggerHandle = QueueHandle<ObjectRef>;

pub struct Controller<Spec, Status> {
    reader: Arc<dyn Reader<Spec, Status>>,
    hooks: SharedHooks,
    resync_period: Duration,
    concurrency: usize,
    requeue_debounce: Duration,
}

impl<Spec, Status> Controller<Spec, Status>
where
    Spec: Send + Sync + 'static,
    Status: Send + Sync + 'static,
{
    pub fn new(reader: Arc<dyn Reader<Spec, Status>>) -> Self {
        Self {
            reader,
            hooks: Arc::new(HookList::default()),
            resync_period: Duration::from_secs(300),
            concurrency: 10,
            requeue_debounce: Duration::from_millis(50),
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: HookList) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    #[must_use]
    pub fn with_resync_period(mut self, period: Duration) -> Self {
        self.resync_period = period;
        self
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Runs until `cancel` fires: seeds the queue with every existing
    /// object, spawns the resync task, then loops spawning up to
    /// `concurrency` reconciles at once. `ctx` is cloned and handed to every
    /// `reconciler`/`error_policy` call, the way `kube_runtime::Controller::run`
    /// passes its `Context<T>` through — typically a bundle of the resource
    /// store and external collaborator clients. `error_policy` decides the
    /// `Action` reported for a failure (used for logging and for any
    /// dependent re-triggering it performs itself); the actual retry delay
    /// is governed by the queue's own exponential backoff, matching
    /// client-go workqueue semantics (spec.md §4.1).
    ///
    /// Once `cancel` is triggered, `run` stops admitting new keys from the
    /// queue and stops the resync task, then waits for every in-flight
    /// worker to finish (spec.md §4.1 "returns when `ctx` is cancelled,
    /// after draining the work queue"; spec.md §5 "worker loops observe
    /// cancellation between items and exit cleanly after draining the
    /// current item and calling `Done`") before returning.
    pub async fn run<Ctx, F, Fut, E>(
        self,
        ctx: Context<Ctx>,
        cancel: CancellationToken,
        reconciler: F,
        error_policy: impl Fn(&E, &ObjectRef, Context<Ctx>) -> Action + Send + Sync + 'static,
    ) where
        Ctx: Send + Sync + 'static,
        F: Fn(Object<Spec, Status>, TriggerHandle, Context<Ctx>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Action, E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let reconciler = Arc::new(reconciler);
        let error_policy = Arc::new(error_policy);
        let hooks = Arc::clone(&self.hooks);
        let reader = Arc::clone(&self.reader);

        let mut queue: RateLimitingQueue<ObjectRef> = RateLimitingQueue::new(self.requeue_debounce);

        if let Ok(refs) = reader.list_refs().await {
            for r in refs {
                queue.handle().add(r);
            }
        }

        let resync_task = {
            let handle = queue.handle();
            let reader = Arc::clone(&reader);
            let resync_period = self.resync_period;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(resync_period);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    match reader.list_refs().await {
                        Ok(refs) => {
                            for r in refs {
                                handle.add(r);
                            }
                        }
                        Err(err) => tracing::warn!(%err, "resync list failed"),
                    }
                }
            })
        };

        let mut workers: JoinSet<(ObjectRef, ReconcileOutcome, Duration)> = JoinSet::new();

        'dispatch: loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::info!("cancellation requested, draining in-flight reconciles");
                    break 'dispatch;
                }

                Some(joined) = workers.join_next(), if !workers.is_empty() => {
                    settle_outcome(joined, &mut queue, hooks.as_ref());
                }

                Some(key) = queue.get(), if workers.len() < self.concurrency => {
                    if let Err(err) = hooks.before_reconcile(&key) {
                        tracing::warn!(%key, %err, "before-reconcile hook aborted this item");
                        queue.done(&key);
                        continue 'dispatch;
                    }
                    let reader = Arc::clone(&reader);
                    let reconciler = Arc::clone(&reconciler);
                    let error_policy = Arc::clone(&error_policy);
                    let retrigger = queue.handle();
                    let ctx = ctx.clone();
                    workers.spawn(async move {
                        let started = Instant::now();
                        let outcome =
                            reconcile_one(reader.as_ref(), &key, reconciler.as_ref(), error_policy.as_ref(), retrigger, ctx).await;
                        (key, outcome, started.elapsed())
                    });
                }
            }
        }

        resync_task.abort();

        while let Some(joined) = workers.join_next().await {
            settle_outcome(joined, &mut queue, hooks.as_ref());
        }
    }
}

/// Marks a finished worker's key `Done`, applies the rate-limiter bookkeeping
/// for its outcome, and runs the after-hooks — shared between the main
/// dispatch loop and the post-cancellation drain (spec.md §4.1 step 5/6).
/// An after-hook error still leaves the key `Done` (it already ran) but, per
/// spec.md §4.1's "leaves its rate-limit state alone", skips the
/// forget/rate-limit step the hook would otherwise have observed.
fn settle_outcome(
    joined: Result<(ObjectRef, ReconcileOutcome, Duration), tokio::task::JoinError>,
    queue: &mut RateLimitingQueue<ObjectRef>,
    hooks: &HookList,
) {
    if let Ok((key, outcome, elapsed)) = joined {
        queue.done(&key);
        match hooks.after_reconcile(&key, &outcome, elapsed) {
            Ok(()) => match &outcome {
                ReconcileOutcome::Success(_) => queue.forget(&key),
                ReconcileOutcome::Failed => queue.add_rate_limited(key.clone()),
            },
            Err(err) => {
                tracing::warn!(%key, %err, "after-reconcile hook aborted this item");
            }
        }
    }
}

async fn reconcile_one<Spec, Status, Ctx, F, Fut, E>(
    reader: &dyn Reader<Spec, Status>,
    key: &ObjectRef,
    reconciler: &F,
    error_policy: &(impl Fn(&E, &ObjectRef, Context<Ctx>) -> Action + Send + Sync),
    retrigger: TriggerHandle,
    ctx: Context<Ctx>,
) -> ReconcileOutcome
where
    F: Fn(Object<Spec, Status>, TriggerHandle, Context<Ctx>) -> Fut,
    Fut: Future<Output = Result<Action, E>> + Send,
    E: std::fmt::Display,
{
    let obj = match reader.get(key).await {
        Ok(obj) => obj,
        Err(ReaderError::NotFound) => return ReconcileOutcome::Success(Action::await_change()),
        Err(err) => {
            tracing::warn!(%key, %err, "failed to fetch object for reconcile");
            return ReconcileOutcome::Failed;
        }
    };
    match reconciler(obj, retrigger.clone(), ctx.clone()).await {
        Ok(action) => {
            if let Some(delay) = action.requeue_after() {
                retrigger.add_after(key.clone(), delay);
            }
            ReconcileOutcome::Success(action)
        }
        Err(err) => {
            let action = error_policy(&err, key, ctx);
            tracing::warn!(%key, %err, requeue_after = ?action.requeue_after(), "reconcile error");
            ReconcileOutcome::Failed
        }
    }
}
