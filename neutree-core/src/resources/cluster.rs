use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::StatusMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterPhase {
    #[default]
    Pending,
    Initializing,
    Running,
    Failed,
    Deleted,
}

/// The cluster's orchestration backend (spec.md §4.3: "names one of
/// {ssh, kubernetes}"), kept as an enum discriminator rather than a raw
/// string so the ssh-only branches of §4.3.1 are exhaustively matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClusterRuntime {
    Ssh { static_workers: Vec<String> },
    Kubernetes { kubeconfig: String },
}

impl ClusterRuntime {
    pub fn is_ssh(&self) -> bool {
        matches!(self, ClusterRuntime::Ssh { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub runtime: ClusterRuntime,
    pub image_registry: String,
    pub version: String,
    #[serde(default)]
    pub preset_key: Option<String>,
}

/// Observed provisioning state of a single static worker ip
/// (spec.md §4.3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeProvisionState {
    Provisioning,
    Provisioned,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterStatus {
    #[serde(flatten)]
    pub common: StatusMeta<ClusterPhase>,
    #[serde(default)]
    pub initialized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    /// JSON-encoded in the database column (spec.md §4.3.1); modeled here
    /// as a typed map since the façade round-trips it through `serde_json`.
    #[serde(default)]
    pub node_provision_status: BTreeMap<String, NodeProvisionState>,
}
