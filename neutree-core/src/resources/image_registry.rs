use serde::{Deserialize, Serialize};

use super::common::StatusMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageRegistryPhase {
    #[default]
    Pending,
    Connected,
    Failed,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageRegistryAuthConfig {
    UsernamePassword { username: String, password: String },
    Token { token: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRegistrySpec {
    pub url: String,
    pub repository: String,
    pub auth_config: ImageRegistryAuthConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRegistryStatus {
    #[serde(flatten)]
    pub common: StatusMeta<ImageRegistryPhase>,
}
