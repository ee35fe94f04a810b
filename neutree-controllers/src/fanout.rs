//! Fan-out helper for concurrent per-item work (spec.md §4.3.1, §9: "use a
//! task group / wait group semantics: spawn one task per ip, collect
//! per-index errors into a pre-sized slot array... Do not rely on in-order
//! channel reads").
//!
//! Built on [`futures::stream::FuturesUnordered`] rather than
//! `tokio::task::JoinSet` so callers can fan out over futures that borrow
//! a collaborator reference (e.g. `&dyn Orchestrator`) instead of requiring
//! an `Arc` and a `'static` spawn — concurrency here means "polled
//! together", not "scheduled on separate OS threads", which is what the
//! per-ip orchestrator calls need.

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};

/// Runs every future in `futures` concurrently and returns their outputs
/// in the same order the futures were given, regardless of completion
/// order.
pub async fn fan_out<Fut: Future>(futures: impl IntoIterator<Item = Fut>) -> Vec<Fut::Output> {
    let mut tagged: FuturesUnordered<_> = futures
        .into_iter()
        .enumerate()
        .map(|(idx, fut)| async move { (idx, fut.await) })
        .collect();

    let mut slots: Vec<Option<Fut::Output>> = Vec::new();
    while let Some((idx, output)) = tagged.next().await {
        if slots.len() <= idx {
            slots.resize_with(idx + 1, || None);
        }
        slots[idx] = Some(output);
    }
    slots.into_iter().map(|s| s.expect("every slot is filled exactly once")).collect()
}
