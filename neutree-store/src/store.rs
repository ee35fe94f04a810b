use async_trait::async_trait;
use neutree_core::{ObjectId, ObjectMeta, ObjectRef};

use crate::error::StoreError;

/// The typed façade contract (spec.md §2 item 2): `GetX`, `ListX(filters)`,
/// `CreateX`, `UpdateX(id, partial)`, `DeleteX(id)` per kind, generalized
/// over the kind's `Spec`/`Status` pair.
///
/// Both [`crate::http::HttpStore`] and [`crate::mock::MockStore`] implement
/// this so reconcilers (in `neutree-controllers`) are written once against
/// the trait and tested against the mock.
#[async_trait]
pub trait ResourceStore<Spec, Status>: Send + Sync
where
    Spec: Send + Sync,
    Status: Send + Sync,
{
    /// Fetch the full object for a queue key. Returns `Ok(None)` only if a
    /// non-`NotFound` distinction isn't meaningful for the caller; most
    /// callers should use `StoreError::NotFound` instead — this exists for
    /// the rare case a caller wants to distinguish "absent" from "error"
    /// without matching on the error type.
    async fn get(&self, key: &ObjectRef) -> Result<neutree_core::Object<Spec, Status>, StoreError>;

    /// List every object of this kind, optionally scoped to a workspace.
    /// Used both by direct callers and by the controller's resync task.
    async fn list(
        &self,
        workspace: Option<&str>,
    ) -> Result<Vec<neutree_core::Object<Spec, Status>>, StoreError>;

    async fn create(
        &self,
        metadata: ObjectMeta,
        spec: Spec,
    ) -> Result<neutree_core::Object<Spec, Status>, StoreError>;

    /// Soft-delete: sets `metadata.deletion_timestamp`. Triggers (or the
    /// mock's emulation) enforce invariant 1 (spec.md §3): no further
    /// `spec` writes are legal afterwards.
    async fn soft_delete(&self, id: &ObjectId) -> Result<(), StoreError>;

    /// Writes only the `status` subdocument (spec.md §4.2: "never spec or
    /// metadata"). Callers are expected to have already debounced via
    /// `neutree-controllers::status::StatusWriter`.
    async fn update_status(&self, id: &ObjectId, status: Status) -> Result<(), StoreError>;

    /// Administrative spec update, used outside the reconcile loop (and by
    /// the §8 invariant-8 test). Rejected once `deletion_timestamp` is set
    /// (spec.md §3 invariant 1, §4.12 soft-delete guard).
    async fn update_spec(&self, id: &ObjectId, spec: Spec) -> Result<(), StoreError>;

    /// Physically removes the row. Only called after the reconciler has
    /// observed `status.phase == DELETED` (spec.md §3 invariant 2).
    async fn delete(&self, id: &ObjectId) -> Result<(), StoreError>;
}
