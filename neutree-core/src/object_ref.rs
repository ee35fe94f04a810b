use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resource::{Object, ResourceKind};

/// The queue/store key for a resource: `(kind, workspace, name)`.
///
/// This generalizes `kube_runtime::reflector::ObjectRef<K>` (which keys on
/// group/version/kind/namespace/name) down to the simpler triple that
/// suffices here, since `name` is unique within `(kind, workspace)`
/// (spec.md §3) and there is only ever one version of a kind in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ResourceKind,
    pub workspace: Option<String>,
    pub name: String,
}

impl ObjectRef {
    pub fn new(kind: ResourceKind, workspace: Option<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            workspace,
            name: name.into(),
        }
    }

    pub fn from_object<Spec, Status>(obj: &Object<Spec, Status>) -> Self {
        Self {
            kind: obj.kind,
            workspace: obj.metadata.workspace.clone(),
            name: obj.metadata.name.clone(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.workspace {
            Some(ws) => write!(f, "{}/{}/{}", self.kind.table_name(), ws, self.name),
            None => write!(f, "{}/{}", self.kind.table_name(), self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_workspace_when_present() {
        let r = ObjectRef::new(ResourceKind::Endpoint, Some("w".into()), "e1");
        assert_eq!(r.to_string(), "endpoint/w/e1");
    }

    #[test]
    fn display_omits_workspace_for_global_kinds() {
        let r = ObjectRef::new(ResourceKind::Role, None, "viewer");
        assert_eq!(r.to_string(), "role/viewer");
    }
}
