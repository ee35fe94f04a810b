//! ExternalEndpoint reconciler (spec.md §4.7): syncs a user-supplied
//! external URL into the gateway and resolves its serve URL on success.

use std::sync::Arc;

use async_trait::async_trait;
use neutree_core::resources::external_endpoint::{ExternalEndpointPhase, ExternalEndpointSpec, ExternalEndpointStatus};
use neutree_core::{time::rfc3339_now, Object, ResourceKind};

use crate::collaborators::Gateway;
use crate::reconcile::{PassOutcome, Reconciler};

type ExternalEndpointObject = Object<ExternalEndpointSpec, ExternalEndpointStatus>;

pub struct ExternalEndpointReconciler {
    pub gateway: Arc<dyn Gateway>,
}

impl ExternalEndpointReconciler {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Reconciler for ExternalEndpointReconciler {
    type Spec = ExternalEndpointSpec;
    type Status = ExternalEndpointStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::ExternalEndpoint
    }

    async fn handle_normal(&self, obj: &ExternalEndpointObject) -> PassOutcome<ExternalEndpointStatus> {
        let mut status = obj.status.clone();
        match self.gateway.sync_external_endpoint(&obj.spec).await {
            Ok(()) => {
                if status.common.phase != ExternalEndpointPhase::Running {
                    status.common.last_transition_time = Some(rfc3339_now());
                }
                status.common.phase = ExternalEndpointPhase::Running;
                status.common.error_message = String::new();
                match self.gateway.get_external_endpoint_serve_url(obj.name()).await {
                    Ok(url) => status.service_url = Some(url),
                    Err(err) => {
                        tracing::warn!(external_endpoint = obj.name(), error = %err, "failed to resolve external endpoint serve url, keeping old value");
                    }
                }
            }
            Err(err) => {
                status.common.phase = ExternalEndpointPhase::Failed;
                status.common.error_message = format!("failed to sync external endpoint into gateway: {err}");
            }
        }
        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &ExternalEndpointObject) -> PassOutcome<ExternalEndpointStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == ExternalEndpointPhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }
        match self.gateway.delete_external_endpoint(obj.name()).await {
            Ok(()) => {
                status.common.phase = ExternalEndpointPhase::Deleted;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            Err(err) => {
                status.common.error_message = format!("failed to delete external endpoint from gateway: {err}");
            }
        }
        PassOutcome::status(status)
    }
}
