use serde::{Deserialize, Serialize};

use super::common::StatusMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RolePhase {
    #[default]
    Pending,
    Created,
    Failed,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSpec {
    pub permissions: Vec<String>,
    /// Non-null marks this a preset row, immutable and non-deletable
    /// regardless of caller permissions (spec.md §3 invariant 4, §4.12).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoleStatus {
    #[serde(flatten)]
    pub common: StatusMeta<RolePhase>,
}
