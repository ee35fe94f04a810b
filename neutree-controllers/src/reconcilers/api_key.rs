//! ApiKey reconciler (spec.md §4.7): syncs/deletes through the gateway.

use std::sync::Arc;

use async_trait::async_trait;
use neutree_core::resources::api_key::{ApiKeyPhase, ApiKeySpec, ApiKeyStatus};
use neutree_core::{time::rfc3339_now, Object, ResourceKind};

use crate::collaborators::Gateway;
use crate::reconcile::{PassOutcome, Reconciler};

type ApiKeyObject = Object<ApiKeySpec, ApiKeyStatus>;

pub struct ApiKeyReconciler {
    pub gateway: Arc<dyn Gateway>,
}

impl ApiKeyReconciler {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Reconciler for ApiKeyReconciler {
    type Spec = ApiKeySpec;
    type Status = ApiKeyStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::ApiKey
    }

    async fn handle_normal(&self, obj: &ApiKeyObject) -> PassOutcome<ApiKeyStatus> {
        let mut status = obj.status.clone();
        match self.gateway.sync_api_key(&obj.id.to_string(), &obj.spec).await {
            Ok(()) => {
                if status.common.phase != ApiKeyPhase::Created {
                    status.common.last_transition_time = Some(rfc3339_now());
                }
                status.common.phase = ApiKeyPhase::Created;
                status.common.error_message = String::new();
            }
            Err(err) => {
                status.common.phase = ApiKeyPhase::Failed;
                status.common.error_message = format!("failed to sync api key into gateway: {err}");
            }
        }
        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &ApiKeyObject) -> PassOutcome<ApiKeyStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == ApiKeyPhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }
        match self.gateway.delete_api_key(&obj.id.to_string()).await {
            Ok(()) => {
                status.common.phase = ApiKeyPhase::Deleted;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            Err(err) => {
                status.common.error_message = format!("failed to delete api key from gateway: {err}");
            }
        }
        PassOutcome::status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::mock::MockGateway;
    use neutree_core::{ObjectId, ObjectMeta};

    fn obj() -> ApiKeyObject {
        Object {
            id: ObjectId::Uuid(uuid::Uuid::nil()),
            api_version: "v1".to_string(),
            kind: ResourceKind::ApiKey,
            metadata: ObjectMeta {
                name: "ak".to_string(),
                display_name: None,
                workspace: None,
                deletion_timestamp: None,
                creation_timestamp: rfc3339_now(),
                update_timestamp: rfc3339_now(),
                labels: Default::default(),
                annotations: Default::default(),
            },
            spec: ApiKeySpec {
                user_id: "11111111-1111-1111-1111-111111111111".to_string(),
                scopes: vec![],
            },
            status: ApiKeyStatus::default(),
        }
    }

    #[tokio::test]
    async fn successful_sync_transitions_to_created() {
        let reconciler = ApiKeyReconciler::new(Arc::new(MockGateway::new()));
        let outcome = reconciler.handle_normal(&obj()).await;
        assert_eq!(outcome.status.common.phase, ApiKeyPhase::Created);
    }

    #[tokio::test]
    async fn deletion_failure_keeps_row() {
        let gateway = MockGateway::new();
        gateway.set_delete_api_key(Err("gateway unavailable".to_string()));
        let reconciler = ApiKeyReconciler::new(Arc::new(gateway));
        let mut o = obj();
        o.metadata.deletion_timestamp = Some(rfc3339_now());
        let outcome = reconciler.handle_deletion(&o).await;
        assert_ne!(outcome.status.common.phase, ApiKeyPhase::Deleted);
        assert!(!outcome.delete_row);
    }
}
