//! The deferred, debounced status write every reconciler funnels through
//! (spec.md §4.2, §9): "run the pass, compute final phase, write once...
//! unless the status is already in the target phase with matching error."
//!
//! [`write_status`] is the single chokepoint: it compares the candidate
//! status against the current one field-by-field (via `Status: PartialEq`,
//! satisfied by every per-kind status type in `neutree-core::resources`)
//! and skips the store call entirely when they're equal, satisfying
//! invariant 4 (spec.md §8) without each reconciler re-deriving the
//! comparison itself.

use neutree_core::ObjectId;
use neutree_store::{ResourceStore, StoreError};

/// Writes `candidate` as the new status for `id` unless it is already
/// equal to `current` — the debounce spec.md §4.2/§9 requires.
///
/// Callers are expected to have already stamped `last_transition_time` on
/// `candidate` only when the phase actually changed, per spec.md §4.2
/// ("`last_transition_time` is set to the current wall clock"); comparing
/// the full struct means a change to `last_transition_time` alone would
/// defeat the debounce, so reconcilers must only update it alongside an
/// actual phase change.
pub async fn write_status<Spec, Status>(
    store: &dyn ResourceStore<Spec, Status>,
    id: &ObjectId,
    current: &Status,
    candidate: Status,
) -> Result<(), StoreError>
where
    Spec: Send + Sync,
    Status: PartialEq + Clone + Send + Sync,
{
    if current == &candidate {
        return Ok(());
    }
    store.update_status(id, candidate).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use neutree_core::ObjectMeta;
    use parking_lot::Mutex;

    struct RecordingStore {
        writes: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl ResourceStore<(), u32> for RecordingStore {
        async fn get(&self, _key: &neutree_core::ObjectRef) -> Result<neutree_core::Object<(), u32>, StoreError> {
            unimplemented!()
        }
        async fn list(&self, _workspace: Option<&str>) -> Result<Vec<neutree_core::Object<(), u32>>, StoreError> {
            unimplemented!()
        }
        async fn create(&self, _metadata: ObjectMeta, _spec: ()) -> Result<neutree_core::Object<(), u32>, StoreError> {
            unimplemented!()
        }
        async fn soft_delete(&self, _id: &ObjectId) -> Result<(), StoreError> {
            unimplemented!()
        }
        async fn update_status(&self, _id: &ObjectId, status: u32) -> Result<(), StoreError> {
            self.writes.lock().push(status);
            Ok(())
        }
        async fn update_spec(&self, _id: &ObjectId, _spec: ()) -> Result<(), StoreError> {
            unimplemented!()
        }
        async fn delete(&self, _id: &ObjectId) -> Result<(), StoreError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn identical_status_skips_the_write() {
        let store = RecordingStore { writes: Mutex::new(vec![]) };
        write_status::<(), u32>(&store, &ObjectId::Int(1), &5, 5).await.unwrap();
        assert!(store.writes.lock().is_empty());
    }

    #[tokio::test]
    async fn changed_status_is_written_once() {
        let store = RecordingStore { writes: Mutex::new(vec![]) };
        write_status::<(), u32>(&store, &ObjectId::Int(1), &5, 6).await.unwrap();
        assert_eq!(*store.writes.lock(), vec![6]);
    }
}
