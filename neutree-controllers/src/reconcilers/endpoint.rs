//! Endpoint reconciler (spec.md §4.6).
//!
//! Orchestrator resolution by cluster+workspace (spec.md §4.6, §6) happens
//! one layer up, the same way [`super::cluster::ClusterReconciler`] is
//! handed an already-resolved [`Orchestrator`] rather than a resolver: the
//! controller-manager wiring binds one `Orchestrator` per cluster runtime
//! kind and this reconciler is constructed per dispatch with that binding
//! already in hand.

use std::sync::Arc;

use async_trait::async_trait;
use neutree_core::resources::endpoint::{EndpointPhase, EndpointSpec, EndpointStatus};
use neutree_core::{is_force_delete, time::rfc3339_now, Object, ResourceKind};

use crate::collaborators::orchestrator::EndpointRuntimeStatus;
use crate::collaborators::{Gateway, Orchestrator};
use crate::reconcile::{PassOutcome, Reconciler};

type EndpointObject = Object<EndpointSpec, EndpointStatus>;

pub struct EndpointReconciler {
    pub orchestrator: Arc<dyn Orchestrator>,
    pub gateway: Arc<dyn Gateway>,
}

impl EndpointReconciler {
    pub fn new(orchestrator: Arc<dyn Orchestrator>, gateway: Arc<dyn Gateway>) -> Self {
        Self { orchestrator, gateway }
    }
}

#[async_trait]
impl Reconciler for EndpointReconciler {
    type Spec = EndpointSpec;
    type Status = EndpointStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Endpoint
    }

    async fn handle_normal(&self, obj: &EndpointObject) -> PassOutcome<EndpointStatus> {
        let mut status = obj.status.clone();
        let mut error_message = String::new();

        let paused = self.orchestrator.is_endpoint_paused(obj).await.unwrap_or(false);
        let reconcile_result = if paused {
            self.orchestrator.pause_endpoint(obj).await
        } else {
            match self.orchestrator.create_endpoint(obj).await {
                Ok(()) => self.gateway.sync_endpoint(obj).await,
                Err(err) => Err(err),
            }
        };
        if let Err(err) = reconcile_result {
            error_message = err;
        }

        let mut phase = status.common.phase;
        if error_message.is_empty() {
            match self.orchestrator.get_endpoint_status(obj).await {
                Ok(EndpointRuntimeStatus::Running) if paused => {
                    phase = EndpointPhase::Paused;
                }
                Ok(EndpointRuntimeStatus::Running) => {
                    phase = EndpointPhase::Running;
                    match self.gateway.get_endpoint_serve_url(obj).await {
                        Ok(url) if !url.is_empty() => status.service_url = Some(url),
                        Ok(_) => {}
                        Err(err) => {
                            tracing::warn!(endpoint = obj.name(), error = %err, "failed to resolve endpoint serve url, keeping old value");
                        }
                    }
                }
                Ok(EndpointRuntimeStatus::Pending) => phase = EndpointPhase::Pending,
                Ok(EndpointRuntimeStatus::Failed) => phase = EndpointPhase::Failed,
                Err(err) => {
                    error_message = err;
                }
            }
        }

        if !error_message.is_empty() {
            phase = EndpointPhase::Failed;
        }
        if phase != status.common.phase {
            status.common.last_transition_time = Some(rfc3339_now());
        }
        status.common.phase = phase;
        status.common.error_message = error_message;

        PassOutcome::status(status)
    }

    async fn handle_deletion(&self, obj: &EndpointObject) -> PassOutcome<EndpointStatus> {
        let mut status = obj.status.clone();
        if status.common.phase == EndpointPhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }

        let mut result: Result<(), String> = Ok(());
        if let Err(err) = self.gateway.delete_endpoint(obj).await {
            result = Err(format!("failed to delete endpoint from gateway: {err}"));
        }
        if result.is_ok() {
            if let Err(err) = self.orchestrator.delete_endpoint(obj).await {
                result = Err(format!("failed to delete endpoint: {err}"));
            }
        }

        let force = is_force_delete(&obj.metadata.annotations);
        match result {
            Ok(()) => {
                status.common.phase = EndpointPhase::Deleted;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            Err(err) if force => {
                tracing::warn!(endpoint = obj.name(), error = %err, "force-deleting endpoint despite cleanup failure");
                status.common.phase = EndpointPhase::Deleted;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            Err(err) => {
                status.common.phase = EndpointPhase::Deleting;
                status.common.error_message = err;
            }
        }

        PassOutcome::status(status)
    }
}
