use std::collections::BTreeMap;

/// Annotation key that downgrades external-cleanup failures to warnings
/// during a delete pass (spec.md §4.9, §6).
pub const FORCE_DELETE_ANNOTATION: &str = "neutree.ai/force-delete";

const FORCE_DELETE_TRUE: &str = "true";

/// Whether `metadata.annotations` carries the force-delete annotation with
/// its fixed truthy value.
///
/// Deliberately a two-line helper evaluated inside each reconciler's delete
/// path (spec.md §9 design note: "do not try to centralize it above the
/// reconcile call" — its effect on phase selection is kind-specific).
pub fn is_force_delete(annotations: &BTreeMap<String, String>) -> bool {
    annotations
        .get(FORCE_DELETE_ANNOTATION)
        .map(|v| v == FORCE_DELETE_TRUE)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_annotation_is_not_force_delete() {
        assert!(!is_force_delete(&BTreeMap::new()));
    }

    #[test]
    fn exact_truthy_value_is_force_delete() {
        let mut m = BTreeMap::new();
        m.insert(FORCE_DELETE_ANNOTATION.to_string(), "true".to_string());
        assert!(is_force_delete(&m));
    }

    #[test]
    fn other_values_are_not_force_delete() {
        let mut m = BTreeMap::new();
        m.insert(FORCE_DELETE_ANNOTATION.to_string(), "yes".to_string());
        assert!(!is_force_delete(&m));
    }
}
