use async_trait::async_trait;
use neutree_core::resources::cluster::{ClusterSpec, ClusterStatus};
use neutree_core::resources::endpoint::{EndpointSpec, EndpointStatus};
use neutree_core::Object;

/// Observed cluster facts the reconciler itself doesn't track in `status`
/// (spec.md §6: `ClusterStatus→{ReadyNodes, DesireNodes, Version, RayVersion}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRuntimeStatus {
    pub ready_nodes: u32,
    pub desire_nodes: u32,
    pub version: String,
    pub ray_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRuntimeStatus {
    Pending,
    Running,
    Failed,
}

pub type ClusterObject = Object<ClusterSpec, ClusterStatus>;
pub type EndpointObject = Object<EndpointSpec, EndpointStatus>;

/// Provisions nodes and deploys model-serving workloads for one cluster
/// runtime variant (spec.md §1, §6: "out of scope... only their interface
/// contracts are specified").
#[async_trait]
pub trait Orchestrator: Send + Sync {
    async fn create_cluster(&self, cluster: &ClusterObject) -> Result<String, String>;
    async fn delete_cluster(&self, cluster: &ClusterObject) -> Result<(), String>;
    async fn health_check(&self, cluster: &ClusterObject) -> Result<(), String>;
    async fn cluster_status(&self, cluster: &ClusterObject) -> Result<ClusterRuntimeStatus, String>;
    async fn sync_cluster(&self, cluster: &ClusterObject) -> Result<(), String>;

    /// ssh-only (spec.md §4.3.1); implementations for kubernetes clusters
    /// should return an empty vec rather than erroring, since the caller
    /// only invokes this when `ClusterRuntime::is_ssh()`.
    async fn get_desire_static_workers_ip(&self, cluster: &ClusterObject) -> Result<Vec<String>, String>;
    async fn start_node(&self, cluster: &ClusterObject, ip: &str) -> Result<(), String>;
    async fn stop_node(&self, cluster: &ClusterObject, ip: &str) -> Result<(), String>;

    async fn create_endpoint(&self, endpoint: &EndpointObject) -> Result<(), String>;
    async fn delete_endpoint(&self, endpoint: &EndpointObject) -> Result<(), String>;
    async fn pause_endpoint(&self, endpoint: &EndpointObject) -> Result<(), String>;
    async fn is_endpoint_paused(&self, endpoint: &EndpointObject) -> Result<bool, String>;
    async fn get_endpoint_status(&self, endpoint: &EndpointObject) -> Result<EndpointRuntimeStatus, String>;
}
