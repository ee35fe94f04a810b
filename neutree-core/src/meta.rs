use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The metadata subdocument shared by every resource kind (spec.md §3).
///
/// `name` is unique within `(kind, workspace)`; `workspace` is absent for
/// global kinds (roles, role assignments, user profiles, workspaces
/// themselves, image registries, model registries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<DateTime<Utc>>,
    pub creation_timestamp: DateTime<Utc>,
    pub update_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn is_deleting(&self) -> bool {
        self.deletion_timestamp.is_some()
    }

    /// Reserved names that mark a preset row immutable/non-deletable
    /// regardless of the `spec.preset_key` check (spec.md §3 invariant 4).
    pub fn is_reserved_name(&self) -> bool {
        matches!(
            self.name.as_str(),
            "admin" | "admin-global-role-assignment" | "default"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> ObjectMeta {
        ObjectMeta {
            name: name.to_string(),
            display_name: None,
            workspace: None,
            deletion_timestamp: None,
            creation_timestamp: Utc::now(),
            update_timestamp: Utc::now(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }

    #[test]
    fn reserved_names_are_flagged() {
        assert!(meta("admin").is_reserved_name());
        assert!(meta("default").is_reserved_name());
        assert!(!meta("my-workspace").is_reserved_name());
    }

    #[test]
    fn deletion_timestamp_marks_deleting() {
        let mut m = meta("x");
        assert!(!m.is_deleting());
        m.deletion_timestamp = Some(Utc::now());
        assert!(m.is_deleting());
    }
}
