use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::StatusMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointPhase {
    #[default]
    Pending,
    Running,
    Failed,
    Deleting,
    Deleted,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointResources {
    pub cpu: Value,
    pub memory: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRouter {
    pub replicas: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointModel {
    pub name: String,
    pub model_registry: String,
    pub resources: EndpointResources,
    pub router: EndpointRouter,
    pub access_mode: String,
    #[serde(default)]
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub cluster: String,
    pub model: EndpointModel,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EndpointStatus {
    #[serde(flatten)]
    pub common: StatusMeta<EndpointPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
}
