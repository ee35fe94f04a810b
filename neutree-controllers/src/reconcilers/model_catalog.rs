//! ModelCatalog reconciler (spec.md §4.7): no external side effects, but
//! unlike Engine/Role/RoleAssignment a FAILED catalog is given another
//! chance — it resets to PENDING so the next pass retries instead of
//! staying stuck.

use async_trait::async_trait;
use neutree_core::resources::model_catalog::{ModelCatalogPhase, ModelCatalogSpec, ModelCatalogStatus};
use neutree_core::{time::rfc3339_now, Object, ResourceKind};

use crate::reconcile::{PassOutcome, Reconciler};

type ModelCatalogObject = Object<ModelCatalogSpec, ModelCatalogStatus>;

#[derive(Default)]
pub struct ModelCatalogReconciler;

#[async_trait]
impl Reconciler for ModelCatalogReconciler {
    type Spec = ModelCatalogSpec;
    type Status = ModelCatalogStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::ModelCatalog
    }

    async fn handle_normal(&self, obj: &ModelCatalogObject) -> PassOutcome<ModelCatalogStatus> {
        let mut status = obj.status.clone();
        match status.common.phase {
            ModelCatalogPhase::Pending => {
                status.common.phase = ModelCatalogPhase::Ready;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            ModelCatalogPhase::Failed => {
                status.common.phase = ModelCatalogPhase::Pending;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            ModelCatalogPhase::Ready | ModelCatalogPhase::Deleted => {}
        }
        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &ModelCatalogObject) -> PassOutcome<ModelCatalogStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == ModelCatalogPhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }
        status.common.phase = ModelCatalogPhase::Deleted;
        status.common.error_message = String::new();
        status.common.last_transition_time = Some(rfc3339_now());
        PassOutcome::status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neutree_core::{ObjectId, ObjectMeta};

    fn obj(phase: ModelCatalogPhase) -> ModelCatalogObject {
        let mut status = ModelCatalogStatus::default();
        status.common.phase = phase;
        Object {
            id: ObjectId::Int(1),
            api_version: "v1".to_string(),
            kind: ResourceKind::ModelCatalog,
            metadata: ObjectMeta {
                name: "mc".to_string(),
                display_name: None,
                workspace: Some("w".to_string()),
                deletion_timestamp: None,
                creation_timestamp: rfc3339_now(),
                update_timestamp: rfc3339_now(),
                labels: Default::default(),
                annotations: Default::default(),
            },
            spec: ModelCatalogSpec {
                model_registry: "mr".to_string(),
                models: vec!["llama-3".to_string()],
            },
            status,
        }
    }

    #[tokio::test]
    async fn pending_becomes_ready() {
        let outcome = ModelCatalogReconciler.handle_normal(&obj(ModelCatalogPhase::Pending)).await;
        assert_eq!(outcome.status.common.phase, ModelCatalogPhase::Ready);
    }

    #[tokio::test]
    async fn failed_retries_to_pending_instead_of_staying_stuck() {
        let outcome = ModelCatalogReconciler.handle_normal(&obj(ModelCatalogPhase::Failed)).await;
        assert_eq!(outcome.status.common.phase, ModelCatalogPhase::Pending);
    }
}
