//! A rate-limiting work queue: [`crate::scheduler::Scheduler`]'s dedup/delay
//! semantics (from `kube_runtime::scheduler`) plus per-key exponential
//! backoff and an in-flight set, the way client-go's `workqueue.RateLimiting`
//! combines a delaying queue with a rate limiter — `Get`/`Done`/`Forget`/
//! `AddRateLimited` map to [`RateLimitingQueue::get`], [`RateLimitingQueue::done`],
//! [`RateLimitingQueue::forget`], [`RateLimitingQueue::add_rate_limited`].

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::scheduler::{ScheduleRequest, Scheduler};

/// Retries indefinitely with a capped exponential interval, the posture
/// client-go controllers (and `kube_runtime::watcher::default_backoff`) take
/// for errors expected to be transient.
fn default_backoff() -> ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_secs(1))
        .with_max_interval(Duration::from_secs(300))
        .with_max_elapsed_time(None)
        .build()
}

/// A cloneable sender side of a [`RateLimitingQueue`], handed to reconcilers
/// so they can enqueue dependent objects without holding the queue itself.
pub struct QueueHandle<T> {
    tx: mpsc::UnboundedSender<ScheduleRequest<T>>,
}

impl<T> Clone for QueueHandle<T> {
    fn clone(&self) -> Self {
        QueueHandle { tx: self.tx.clone() }
    }
}

impl<T> QueueHandle<T> {
    pub fn add(&self, item: T) {
        let _ = self.tx.send(ScheduleRequest {
            message: item,
            run_at: Instant::now(),
        });
    }

    pub fn add_after(&self, item: T, delay: Duration) {
        let _ = self.tx.send(ScheduleRequest {
            message: item,
            run_at: Instant::now() + delay,
        });
    }
}

pub struct RateLimitingQueue<T> {
    scheduler: Scheduler<T>,
    handle: QueueHandle<T>,
    in_flight: HashSet<T>,
    backoffs: HashMap<T, ExponentialBackoff>,
    requeue_debounce: Duration,
}

impl<T: Eq + Hash + Clone> RateLimitingQueue<T> {
    pub fn new(debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            scheduler: Scheduler::new(rx, debounce),
            handle: QueueHandle { tx },
            in_flight: HashSet::new(),
            backoffs: HashMap::new(),
            requeue_debounce: debounce,
        }
    }

    pub fn handle(&self) -> QueueHandle<T> {
        self.handle.clone()
    }

    /// Waits for the next item not already in flight. An item that comes due
    /// while its previous run is still in flight is pushed back a short,
    /// fixed delay instead of blocking everything behind it — the dedup
    /// queue's `hold_unless` trick from `kube_runtime::controller::runner::Runner`.
    pub async fn get(&mut self) -> Option<T> {
        loop {
            let item = self.scheduler.next().await?;
            if self.in_flight.contains(&item) {
                self.handle.add_after(item, self.requeue_debounce);
                continue;
            }
            self.in_flight.insert(item.clone());
            return Some(item);
        }
    }

    /// Marks `item` as no longer in flight. Must be called exactly once per
    /// [`RateLimitingQueue::get`] result once its reconcile attempt ends,
    /// success or failure.
    pub fn done(&mut self, item: &T) {
        self.in_flight.remove(item);
    }

    /// Drops `item`'s backoff state after a successful reconcile, so its
    /// next failure starts from the initial interval again.
    pub fn forget(&mut self, item: &T) {
        self.backoffs.remove(item);
    }

    /// Re-enqueues `item` after its next backoff interval, growing the
    /// interval on each call that isn't preceded by [`RateLimitingQueue::forget`].
    pub fn add_rate_limited(&mut self, item: T) {
        let backoff = self.backoffs.entry(item.clone()).or_insert_with(default_backoff);
        let delay = backoff.next_backoff().unwrap_or(Duration::from_secs(300));
        self.handle.add_after(item, delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn in_flight_item_is_redelivered_after_done() {
        let mut q: RateLimitingQueue<u8> = RateLimitingQueue::new(Duration::ZERO);
        q.handle().add(1);
        assert_eq!(q.get().await, Some(1));
        // Re-add while in flight: should be held, not delivered immediately.
        q.handle().add(1);
        tokio::time::advance(Duration::from_millis(10)).await;
        let delivered_again = tokio::time::timeout(Duration::from_millis(5), q.get()).await;
        assert!(delivered_again.is_err(), "item still in flight should not be redelivered yet");
        q.done(&1);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_retries_grow_backoff() {
        let mut q: RateLimitingQueue<u8> = RateLimitingQueue::new(Duration::ZERO);
        q.add_rate_limited(7);
        let first_delay = {
            let entry = q.backoffs.get(&7).unwrap();
            entry.current_interval
        };
        q.add_rate_limited(7);
        let second_delay = q.backoffs.get(&7).unwrap().current_interval;
        assert!(second_delay > first_delay);
    }

    #[tokio::test(start_paused = true)]
    async fn forget_resets_backoff_state() {
        let mut q: RateLimitingQueue<u8> = RateLimitingQueue::new(Duration::ZERO);
        q.add_rate_limited(7);
        assert!(q.backoffs.contains_key(&7));
        q.forget(&7);
        assert!(!q.backoffs.contains_key(&7));
    }
}
