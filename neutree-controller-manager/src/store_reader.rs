//! Adapts a [`ResourceStore`] into the [`Reader`] shape `neutree-runtime`'s
//! [`Controller`](neutree_runtime::Controller) drives: every `get`/`list_refs`
//! call goes straight through to the backing store (spec.md §6 has no watch
//! stream to reflect, so there is no in-memory cache to keep warm between
//! calls — see [`Reader`]'s own doc comment).

use async_trait::async_trait;
use neutree_core::{Object, ObjectRef};
use neutree_runtime::reader::{Reader, ReaderError};
use neutree_store::{ResourceStore, StoreError};

pub struct StoreReader<Spec, Status> {
    store: std::sync::Arc<dyn ResourceStore<Spec, Status>>,
    kind: neutree_core::ResourceKind,
}

impl<Spec, Status> StoreReader<Spec, Status> {
    pub fn new(store: std::sync::Arc<dyn ResourceStore<Spec, Status>>, kind: neutree_core::ResourceKind) -> Self {
        Self { store, kind }
    }
}

#[async_trait]
impl<Spec, Status> Reader<Spec, Status> for StoreReader<Spec, Status>
where
    Spec: Send + Sync,
    Status: Send + Sync,
{
    async fn get(&self, key: &ObjectRef) -> Result<Object<Spec, Status>, ReaderError> {
        match self.store.get(key).await {
            Ok(obj) => Ok(obj),
            Err(StoreError::NotFound) => Err(ReaderError::NotFound),
            Err(err) => Err(ReaderError::Store(err.to_string())),
        }
    }

    async fn list_refs(&self) -> Result<Vec<ObjectRef>, ReaderError> {
        let objects = self
            .store
            .list(None)
            .await
            .map_err(|err| ReaderError::Store(err.to_string()))?;
        Ok(objects
            .iter()
            .map(|obj| ObjectRef::new(self.kind, obj.metadata.workspace.clone(), obj.name().to_string()))
            .collect())
    }
}
