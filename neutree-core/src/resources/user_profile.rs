use serde::{Deserialize, Serialize};

use super::common::StatusMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserProfilePhase {
    #[default]
    Pending,
    Created,
    Failed,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileSpec {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfileStatus {
    #[serde(flatten)]
    pub common: StatusMeta<UserProfilePhase>,
    /// The last `spec` that was successfully synced to the auth service
    /// (spec.md §4.8). Absent means no sync has ever succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_spec: Option<UserProfileSpec>,
}
