//! Cluster reconciler (spec.md §4.3, §4.3.1).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use neutree_core::resources::cluster::{ClusterPhase, ClusterSpec, ClusterStatus, NodeProvisionState};
use neutree_core::resources::common::StatusMeta;
use neutree_core::{is_force_delete, time::rfc3339_now, Object, ResourceKind};

use crate::collaborators::{Gateway, Orchestrator};
use crate::fanout::fan_out;
use crate::reconcile::{PassOutcome, Reconciler};

type ClusterObject = Object<ClusterSpec, ClusterStatus>;

pub struct ClusterReconciler {
    pub orchestrator: Arc<dyn Orchestrator>,
    pub gateway: Arc<dyn Gateway>,
}

impl ClusterReconciler {
    pub fn new(orchestrator: Arc<dyn Orchestrator>, gateway: Arc<dyn Gateway>) -> Self {
        Self { orchestrator, gateway }
    }

    async fn reconcile_running(&self, obj: &ClusterObject, status: &mut ClusterStatus) -> Result<(), String> {
        if obj.spec.runtime.is_ssh() {
            let desired = self
                .orchestrator
                .get_desire_static_workers_ip(obj)
                .await
                .map_err(|e| format!("failed to list desired static workers: {e}"))?;
            let (node_status, node_err) =
                reconcile_static_nodes(self.orchestrator.as_ref(), obj, &desired, &status.node_provision_status).await;
            status.node_provision_status = node_status;
            if let Some(err) = node_err {
                return Err(err);
            }
            tracing::debug!(cluster = obj.name(), "registering metrics monitor for ssh cluster");
        }
        self.orchestrator
            .sync_cluster(obj)
            .await
            .map_err(|e| format!("failed to sync cluster: {e}"))?;
        self.orchestrator
            .health_check(obj)
            .await
            .map_err(|e| format!("cluster health check failed: {e}"))?;
        self.gateway
            .sync_cluster(obj)
            .await
            .map_err(|e| format!("failed to sync cluster into gateway: {e}"))?;
        Ok(())
    }
}

#[async_trait]
impl Reconciler for ClusterReconciler {
    type Spec = ClusterSpec;
    type Status = ClusterStatus;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Cluster
    }

    async fn handle_normal(&self, obj: &ClusterObject) -> PassOutcome<ClusterStatus> {
        let mut status = obj.status.clone();
        let mut result = Ok(());

        if !status.initialized {
            match self.orchestrator.create_cluster(obj).await {
                Ok(head_ip) => {
                    status.dashboard_url = Some(format!("http://{head_ip}:8265"));
                    status.initialized = true;
                    match self.orchestrator.health_check(obj).await {
                        Ok(()) => status.common.phase = ClusterPhase::Running,
                        Err(_) => status.common.phase = ClusterPhase::Initializing,
                    }
                }
                Err(err) => {
                    result = Err(format!("failed to create cluster: {err}"));
                }
            }
        } else if status.common.phase == ClusterPhase::Running {
            result = self.reconcile_running(obj, &mut status).await;
        }

        finish_normal_pass(status, result)
    }

    async fn handle_deletion(&self, obj: &ClusterObject) -> PassOutcome<ClusterStatus> {
        let mut status = obj.status.clone();

        if status.common.phase == ClusterPhase::Deleted {
            return PassOutcome::status_and_delete(status);
        }

        tracing::debug!(cluster = obj.name(), "unregistering metrics monitor");
        let mut result: Result<(), String> = Ok(());
        if let Err(err) = self.gateway.delete_cluster(obj).await {
            result = Err(format!("failed to delete cluster from gateway: {err}"));
        }
        if result.is_ok() && status.initialized {
            if let Err(err) = self.orchestrator.delete_cluster(obj).await {
                result = Err(format!("failed to delete cluster: {err}"));
            }
        }

        let force = is_force_delete(&obj.metadata.annotations);
        match result {
            Ok(()) => {
                status.common.phase = ClusterPhase::Deleted;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            Err(err) if force => {
                tracing::warn!(cluster = obj.name(), error = %err, "force-deleting cluster despite cleanup failure");
                status.common.phase = ClusterPhase::Deleted;
                status.common.error_message = String::new();
                status.common.last_transition_time = Some(rfc3339_now());
            }
            Err(err) => {
                status.common.error_message = err;
            }
        }

        PassOutcome::status(status)
    }
}

fn finish_normal_pass(mut status: ClusterStatus, result: Result<(), String>) -> PassOutcome<ClusterStatus> {
    match result {
        Ok(()) => {
            status.common.error_message = String::new();
        }
        Err(err) => {
            status.common.phase = ClusterPhase::Failed;
            status.common.error_message = err;
        }
    }
    PassOutcome::status(status)
}

/// Converges the observed static-worker map `observed` toward the desired
/// set `desired` (spec.md §4.3.1, §8 invariant 5).
pub async fn reconcile_static_nodes(
    orchestrator: &dyn Orchestrator,
    cluster: &ClusterObject,
    desired: &[String],
    observed: &BTreeMap<String, NodeProvisionState>,
) -> (BTreeMap<String, NodeProvisionState>, Option<String>) {
    let to_stop: Vec<String> = observed
        .keys()
        .filter(|ip| !desired.iter().any(|d| d == *ip))
        .cloned()
        .collect();
    let to_start: Vec<String> = desired
        .iter()
        .filter(|ip| observed.get(*ip) != Some(&NodeProvisionState::Provisioned))
        .cloned()
        .collect();

    let start_results = fan_out(to_start.iter().map(|ip| async move {
        (ip.clone(), orchestrator.start_node(cluster, ip).await)
    }))
    .await;
    let stop_results = fan_out(to_stop.iter().map(|ip| async move {
        (ip.clone(), orchestrator.stop_node(cluster, ip).await)
    }))
    .await;

    let mut new_map = observed.clone();
    let mut errors = Vec::new();

    for (ip, result) in start_results {
        match result {
            Ok(()) => {
                new_map.insert(ip, NodeProvisionState::Provisioned);
            }
            Err(err) => {
                new_map.insert(ip.clone(), NodeProvisionState::Provisioning);
                errors.push(format!("failed to start ray node {ip}: {err}"));
            }
        }
    }
    for (ip, result) in stop_results {
        match result {
            Ok(()) => {
                new_map.remove(&ip);
            }
            Err(err) => {
                errors.push(format!("failed to stop ray node {ip}: {err}"));
            }
        }
    }

    let aggregated = if errors.is_empty() { None } else { Some(errors.join("; ")) };
    (new_map, aggregated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::mock::MockOrchestrator;

    fn cluster_obj() -> ClusterObject {
        use neutree_core::resources::cluster::ClusterRuntime;
        use neutree_core::{ObjectId, ObjectMeta};
        Object {
            id: ObjectId::Int(1),
            api_version: "v1".to_string(),
            kind: ResourceKind::Cluster,
            metadata: ObjectMeta {
                name: "c".to_string(),
                display_name: None,
                workspace: Some("w".to_string()),
                deletion_timestamp: None,
                creation_timestamp: rfc3339_now(),
                update_timestamp: rfc3339_now(),
                labels: Default::default(),
                annotations: Default::default(),
            },
            spec: ClusterSpec {
                runtime: ClusterRuntime::Ssh { static_workers: vec![] },
                image_registry: "ir".to_string(),
                version: "1.0".to_string(),
                preset_key: None,
            },
            status: ClusterStatus::default(),
        }
    }

    #[tokio::test]
    async fn node_convergence_matches_scenario_s3() {
        let orchestrator = MockOrchestrator::new();
        orchestrator.set_start_node("B", Ok(()));
        orchestrator.set_start_node("C", Err("timeout".to_string()));
        orchestrator.set_stop_node("D", Ok(()));

        let mut observed = BTreeMap::new();
        observed.insert("A".to_string(), NodeProvisionState::Provisioned);
        observed.insert("D".to_string(), NodeProvisionState::Provisioned);

        let desired = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let (new_map, err) = reconcile_static_nodes(&orchestrator, &cluster_obj(), &desired, &observed).await;

        assert_eq!(new_map.get("A"), Some(&NodeProvisionState::Provisioned));
        assert_eq!(new_map.get("B"), Some(&NodeProvisionState::Provisioned));
        assert_eq!(new_map.get("C"), Some(&NodeProvisionState::Provisioning));
        assert!(new_map.get("D").is_none());
        assert!(err.unwrap().contains("failed to start ray node C"));
    }

    #[tokio::test]
    async fn force_delete_reaches_deleted_despite_gateway_failure() {
        use neutree_core::force_delete::FORCE_DELETE_ANNOTATION;

        let orchestrator = MockOrchestrator::new();
        let gateway = crate::collaborators::mock::MockGateway::new();
        gateway.set_delete_cluster(Err("gateway unreachable".to_string()));
        let reconciler = ClusterReconciler::new(Arc::new(orchestrator), Arc::new(gateway));

        let mut obj = cluster_obj();
        obj.metadata.deletion_timestamp = Some(rfc3339_now());
        obj.metadata
            .annotations
            .insert(FORCE_DELETE_ANNOTATION.to_string(), "true".to_string());
        obj.status.common.phase = ClusterPhase::Running;
        obj.status.initialized = true;

        let outcome = reconciler.handle_deletion(&obj).await;
        assert_eq!(outcome.status.common.phase, ClusterPhase::Deleted);
        assert_eq!(outcome.status.common.error_message, "");
    }

    #[tokio::test]
    async fn non_force_delete_failure_leaves_phase_unchanged() {
        let orchestrator = MockOrchestrator::new();
        let gateway = crate::collaborators::mock::MockGateway::new();
        gateway.set_delete_cluster(Err("gateway unreachable".to_string()));
        let reconciler = ClusterReconciler::new(Arc::new(orchestrator), Arc::new(gateway));
        let mut obj = cluster_obj();
        obj.metadata.deletion_timestamp = Some(rfc3339_now());
        obj.status.common.phase = ClusterPhase::Running;

        let outcome = reconciler.handle_deletion(&obj).await;
        assert_eq!(outcome.status.common.phase, ClusterPhase::Running);
        assert!(!outcome.delete_row);
    }
}
