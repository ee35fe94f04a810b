use async_trait::async_trait;
use neutree_core::{Object, ObjectRef};

/// The read side a [`crate::Controller`] needs: fetch one object by ref, and
/// list every ref of the kind for the resync sweep.
///
/// Where `kube_runtime::Controller` reads from an in-memory `reflector::Store`
/// kept warm by a watch stream, this reads straight through to the backing
/// `neutree-store` (spec.md §6 has no server-push watch API to reflect), so
/// every reconcile and every resync tick does a live fetch.
#[async_trait]
pub trait Reader<Spec, Status>: Send + Sync {
    async fn get(&self, key: &ObjectRef) -> Result<Object<Spec, Status>, ReaderError>;

    async fn list_refs(&self) -> Result<Vec<ObjectRef>, ReaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("object not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(String),
}
