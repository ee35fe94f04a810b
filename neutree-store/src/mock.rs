//! An in-memory [`ResourceStore`] re-implementing the database's
//! enforcement invariants (spec.md §4.12) in Rust, so the reconciler test
//! suite (spec.md §8) can exercise soft-delete guards, preset protection,
//! and deletion-protection counting without a live Postgres instance.
//!
//! This is a test double, not a second source of truth: the SQL migrations
//! in `neutree-db` remain the authoritative enforcement layer.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use neutree_core::{time::rfc3339_now, Object, ObjectId, ObjectMeta, ObjectRef};
use parking_lot::Mutex;

use crate::error::StoreError;
use crate::store::ResourceStore;

type PresetCheck<Spec> = Arc<dyn Fn(&Spec) -> bool + Send + Sync>;
type DeletionGuard<Spec, Status> =
    Arc<dyn Fn(&Object<Spec, Status>) -> Option<(&'static str, usize)> + Send + Sync>;

pub struct MockStore<Spec, Status> {
    rows: Mutex<BTreeMap<i64, Object<Spec, Status>>>,
    next_id: AtomicI64,
    kind: neutree_core::ResourceKind,
    is_preset: PresetCheck<Spec>,
    deletion_guard: DeletionGuard<Spec, Status>,
}

impl<Spec, Status> MockStore<Spec, Status>
where
    Spec: Clone + Send + Sync,
    Status: Clone + Send + Sync + Default,
{
    pub fn new(kind: neutree_core::ResourceKind) -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            kind,
            is_preset: Arc::new(|_| false),
            deletion_guard: Arc::new(|_| None),
        }
    }

    pub fn with_preset_check(mut self, f: impl Fn(&Spec) -> bool + Send + Sync + 'static) -> Self {
        self.is_preset = Arc::new(f);
        self
    }

    pub fn with_deletion_guard(
        mut self,
        f: impl Fn(&Object<Spec, Status>) -> Option<(&'static str, usize)> + Send + Sync + 'static,
    ) -> Self {
        self.deletion_guard = Arc::new(f);
        self
    }

    /// Seeds a row directly, bypassing `create`, for test setup.
    pub fn seed(&self, obj: Object<Spec, Status>) {
        let id = obj.id.as_int().expect("mock store uses integer ids");
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
        self.rows.lock().insert(id, obj);
    }

    pub fn get_by_id(&self, id: i64) -> Option<Object<Spec, Status>> {
        self.rows.lock().get(&id).cloned()
    }

    fn is_locked(&self, obj: &Object<Spec, Status>) -> bool {
        (self.is_preset)(&obj.spec) || obj.metadata.is_reserved_name()
    }
}

#[async_trait]
impl<Spec, Status> ResourceStore<Spec, Status> for MockStore<Spec, Status>
where
    Spec: Clone + Send + Sync + 'static,
    Status: Clone + Send + Sync + Default + 'static,
{
    async fn get(&self, key: &ObjectRef) -> Result<Object<Spec, Status>, StoreError> {
        let rows = self.rows.lock();
        rows.values()
            .find(|o| o.kind == key.kind && o.metadata.name == key.name && o.metadata.workspace == key.workspace)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, workspace: Option<&str>) -> Result<Vec<Object<Spec, Status>>, StoreError> {
        let rows = self.rows.lock();
        Ok(rows
            .values()
            .filter(|o| workspace.is_none() || o.metadata.workspace.as_deref() == workspace)
            .cloned()
            .collect())
    }

    async fn create(&self, metadata: ObjectMeta, spec: Spec) -> Result<Object<Spec, Status>, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let obj = Object {
            id: ObjectId::Int(id),
            api_version: "v1".to_string(),
            kind: self.kind,
            metadata,
            spec,
            status: Status::default(),
        };
        self.rows.lock().insert(id, obj.clone());
        Ok(obj)
    }

    async fn soft_delete(&self, id: &ObjectId) -> Result<(), StoreError> {
        let mut rows = self.rows.lock();
        let idx = id.as_int().ok_or(StoreError::NotFound)?;
        let obj = rows.get(&idx).ok_or(StoreError::NotFound)?;
        if self.is_locked(obj) {
            return Err(StoreError::Policy(format!(
                "{} is a preset resource and cannot be deleted",
                obj.metadata.name
            )));
        }
        if let Some((kind, count)) = (self.deletion_guard)(obj) {
            return Err(StoreError::Referential(format!(
                "cannot delete {} while {} {}(s) reference it",
                obj.kind.table_name(),
                count,
                kind
            )));
        }
        rows.get_mut(&idx).unwrap().metadata.deletion_timestamp = Some(rfc3339_now());
        Ok(())
    }

    async fn update_status(&self, id: &ObjectId, status: Status) -> Result<(), StoreError> {
        let mut rows = self.rows.lock();
        let idx = id.as_int().ok_or(StoreError::NotFound)?;
        let obj = rows.get_mut(&idx).ok_or(StoreError::NotFound)?;
        obj.status = status;
        obj.metadata.update_timestamp = rfc3339_now();
        Ok(())
    }

    async fn update_spec(&self, id: &ObjectId, spec: Spec) -> Result<(), StoreError> {
        let mut rows = self.rows.lock();
        let idx = id.as_int().ok_or(StoreError::NotFound)?;
        let obj = rows.get_mut(&idx).ok_or(StoreError::NotFound)?;
        if obj.metadata.is_deleting() {
            return Err(StoreError::Policy(
                "Cannot modify spec during soft delete".to_string(),
            ));
        }
        if self.is_locked(obj) {
            return Err(StoreError::Policy(format!(
                "{} is a preset resource and cannot be modified",
                obj.metadata.name
            )));
        }
        obj.spec = spec;
        obj.metadata.update_timestamp = rfc3339_now();
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), StoreError> {
        let mut rows = self.rows.lock();
        let idx = id.as_int().ok_or(StoreError::NotFound)?;
        if let Some(obj) = rows.get(&idx) {
            if self.is_locked(obj) {
                return Err(StoreError::Policy(format!(
                    "{} is a preset resource and cannot be deleted",
                    obj.metadata.name
                )));
            }
        }
        rows.remove(&idx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neutree_core::resources::role::{RolePhase, RoleSpec, RoleStatus};
    use neutree_core::resources::common::StatusMeta;

    fn role(name: &str, preset_key: Option<&str>) -> Object<RoleSpec, RoleStatus> {
        Object {
            id: ObjectId::Int(1),
            api_version: "v1".to_string(),
            kind: neutree_core::ResourceKind::Role,
            metadata: ObjectMeta {
                name: name.to_string(),
                display_name: None,
                workspace: None,
                deletion_timestamp: None,
                creation_timestamp: rfc3339_now(),
                update_timestamp: rfc3339_now(),
                labels: Default::default(),
                annotations: Default::default(),
            },
            spec: RoleSpec {
                permissions: vec![],
                preset_key: preset_key.map(str::to_string),
            },
            status: RoleStatus {
                common: StatusMeta {
                    phase: RolePhase::Created,
                    last_transition_time: None,
                    error_message: String::new(),
                },
            },
        }
    }

    #[tokio::test]
    async fn preset_roles_reject_soft_delete() {
        let store: MockStore<RoleSpec, RoleStatus> =
            MockStore::new(neutree_core::ResourceKind::Role).with_preset_check(|spec| spec.preset_key.is_some());
        store.seed(role("admin-role", Some("admin")));
        let err = store.soft_delete(&ObjectId::Int(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Policy(_)));
    }

    #[tokio::test]
    async fn spec_update_during_soft_delete_is_rejected() {
        let store: MockStore<RoleSpec, RoleStatus> = MockStore::new(neutree_core::ResourceKind::Role);
        let mut r = role("custom", None);
        r.metadata.deletion_timestamp = Some(rfc3339_now());
        store.seed(r);
        let err = store
            .update_spec(
                &ObjectId::Int(1),
                RoleSpec {
                    permissions: vec!["x".into()],
                    preset_key: None,
                },
            )
            .await
            .unwrap_err();
        match err {
            StoreError::Policy(msg) => assert_eq!(msg, "Cannot modify spec during soft delete"),
            other => panic!("expected Policy error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn deletion_guard_blocks_delete_with_dependent_count() {
        let store: MockStore<RoleSpec, RoleStatus> =
            MockStore::new(neutree_core::ResourceKind::Role).with_deletion_guard(|_| Some(("role_assignment", 2)));
        store.seed(role("viewer", None));
        let err = store.soft_delete(&ObjectId::Int(1)).await.unwrap_err();
        match err {
            StoreError::Referential(msg) => {
                assert!(msg.contains("2 role_assignment(s)"));
            }
            other => panic!("expected Referential error, got {other:?}"),
        }
    }
}
