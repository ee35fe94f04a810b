//! Delays and deduplicates reconcile requests (spec.md §2's event-driven +
//! resync trigger combination), generalizing `kube_runtime::scheduler`'s
//! `DelayQueue`-backed dedup to an async loop instead of a hand-polled
//! `Stream` combinator: the same "earlier `run_at` wins, debounce absorbs
//! rapid-fire duplicate requests" semantics, driven by `.next().await`
//! rather than `poll_next`.

use std::hash::Hash;
use std::time::Duration;

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::time::delay_queue::{self, DelayQueue};

/// A request to re-emit `message` at `run_at`. Two requests for the same
/// message collapse into one: the earlier `run_at` wins.
#[derive(Debug)]
pub struct ScheduleRequest<T> {
    pub message: T,
    pub run_at: Instant,
}

struct ScheduledEntry {
    run_at: Instant,
    queue_key: delay_queue::Key,
}

/// Collapses duplicate [`ScheduleRequest`]s for the same key into a single
/// delayed slot, always keeping the soonest requested `run_at`.
pub struct Scheduler<T> {
    queue: DelayQueue<T>,
    scheduled: HashMap<T, ScheduledEntry>,
    requests: mpsc::UnboundedReceiver<ScheduleRequest<T>>,
    requests_closed: bool,
    debounce: Duration,
}

impl<T: Eq + Hash + Clone> Scheduler<T> {
    pub fn new(requests: mpsc::UnboundedReceiver<ScheduleRequest<T>>, debounce: Duration) -> Self {
        Self {
            queue: DelayQueue::new(),
            scheduled: HashMap::new(),
            requests,
            requests_closed: false,
            debounce,
        }
    }

    fn schedule(&mut self, request: ScheduleRequest<T>) {
        let run_at = request.run_at + self.debounce;
        match self.scheduled.entry(request.message) {
            Entry::Occupied(mut entry) if entry.get().run_at >= run_at => {
                self.queue.reset_at(&entry.get().queue_key, run_at);
                entry.get_mut().run_at = run_at;
            }
            Entry::Occupied(_) => {
                // Already due sooner than this request asks for; keep it.
            }
            Entry::Vacant(entry) => {
                let key = self.queue.insert_at(entry.key().clone(), run_at);
                entry.insert(ScheduledEntry { run_at, queue_key: key });
            }
        }
    }

    /// Waits for the next due message, draining and merging any schedule
    /// requests that arrive while waiting. Returns `None` once the request
    /// channel has closed and the delay queue has drained.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            if self.requests_closed {
                return futures::StreamExt::next(&mut self.queue).await.map(|expired| {
                    let msg = expired.into_inner();
                    self.scheduled.remove(&msg);
                    msg
                });
            }

            if self.queue.is_empty() {
                match self.requests.recv().await {
                    Some(req) => self.schedule(req),
                    None => self.requests_closed = true,
                }
                continue;
            }

            tokio::select! {
                biased;

                req = self.requests.recv() => {
                    match req {
                        Some(req) => self.schedule(req),
                        None => self.requests_closed = true,
                    }
                }
                expired = futures::StreamExt::next(&mut self.queue) => {
                    if let Some(expired) = expired {
                        let msg = expired.into_inner();
                        self.scheduled.remove(&msg);
                        return Some(msg);
                    }
                }
            }
        }
    }
}

/// Convenience constructor with no debounce: every request fires at exactly
/// its requested `run_at`.
pub fn scheduler<T: Eq + Hash + Clone>(
    requests: mpsc::UnboundedReceiver<ScheduleRequest<T>>,
) -> Scheduler<T> {
    Scheduler::new(requests, Duration::ZERO)
}
