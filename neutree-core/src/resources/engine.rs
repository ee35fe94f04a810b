use serde::{Deserialize, Serialize};

use super::common::StatusMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnginePhase {
    #[default]
    Pending,
    Ready,
    Failed,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSpec {
    pub accelerator: String,
    pub image: String,
    /// Present when this engine row was seeded by the workspace reconciler
    /// rather than created directly (spec.md §4.7).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeded_by_workspace: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineStatus {
    #[serde(flatten)]
    pub common: StatusMeta<EnginePhase>,
}
