use serde::{Deserialize, Serialize};

use crate::meta::ObjectMeta;

/// Every resource kind the control plane declares desired state for
/// (spec.md §1). `ResourceKind` is the discriminator used by the queue key,
/// the store façade, and the controller registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Cluster,
    ImageRegistry,
    ModelRegistry,
    Endpoint,
    Engine,
    Role,
    RoleAssignment,
    Workspace,
    ApiKey,
    ModelCatalog,
    ExternalEndpoint,
    UserProfile,
}

impl ResourceKind {
    /// Whether rows of this kind are scoped to a workspace or global
    /// (spec.md §3: `workspace` is absent for global kinds).
    pub fn is_workspace_scoped(self) -> bool {
        matches!(
            self,
            ResourceKind::Cluster | ResourceKind::Endpoint | ResourceKind::Engine
        )
    }

    pub fn table_name(self) -> &'static str {
        match self {
            ResourceKind::Cluster => "cluster",
            ResourceKind::ImageRegistry => "image_registry",
            ResourceKind::ModelRegistry => "model_registry",
            ResourceKind::Endpoint => "endpoint",
            ResourceKind::Engine => "engine",
            ResourceKind::Role => "role",
            ResourceKind::RoleAssignment => "role_assignment",
            ResourceKind::Workspace => "workspace",
            ResourceKind::ApiKey => "api_key",
            ResourceKind::ModelCatalog => "model_catalog",
            ResourceKind::ExternalEndpoint => "external_endpoint",
            ResourceKind::UserProfile => "user_profile",
        }
    }
}

/// The primary key of a resource row. Most kinds use a database-assigned
/// integer; user profiles and api keys use an externally-chosen UUID
/// (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectId {
    Int(i64),
    Uuid(uuid::Uuid),
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectId::Int(i) => write!(f, "{i}"),
            ObjectId::Uuid(u) => write!(f, "{u}"),
        }
    }
}

impl ObjectId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ObjectId::Int(i) => Some(*i),
            ObjectId::Uuid(_) => None,
        }
    }

    pub fn as_uuid(&self) -> Option<uuid::Uuid> {
        match self {
            ObjectId::Uuid(u) => Some(*u),
            ObjectId::Int(_) => None,
        }
    }
}

/// The common envelope every resource shares (spec.md §3): schema
/// discriminators, metadata, kind-specific declared state, and
/// kind-specific observed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object<Spec, Status> {
    pub id: ObjectId,
    pub api_version: String,
    pub kind: ResourceKind,
    pub metadata: ObjectMeta,
    pub spec: Spec,
    pub status: Status,
}

impl<Spec, Status> Object<Spec, Status> {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn workspace(&self) -> Option<&str> {
        self.metadata.workspace.as_deref()
    }
}
