use serde::{Deserialize, Serialize};

use super::common::StatusMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelRegistryPhase {
    #[default]
    Pending,
    Connected,
    Failed,
    Deleted,
}

/// `spec.type`, the driver discriminator (spec.md §4.5, §6: "huggingface,
/// file-based, nfs"). Selection happens through the constructor registry in
/// `neutree-controllers::collaborators::model_registry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRegistryType {
    HuggingFace,
    File,
    Nfs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRegistrySpec {
    #[serde(rename = "type")]
    pub ty: ModelRegistryType,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelRegistryStatus {
    #[serde(flatten)]
    pub common: StatusMeta<ModelRegistryPhase>,
}
