use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three status fields every kind shares (spec.md §3: `status: { phase,
/// last_transition_time, error_message, ... kind-specific fields }`).
///
/// Written only by the reconciler, and only through
/// `neutree-controllers::status::StatusWriter`, never directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMeta<Phase> {
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: String,
}

impl<Phase: Default> Default for StatusMeta<Phase> {
    fn default() -> Self {
        StatusMeta {
            phase: Phase::default(),
            last_transition_time: None,
            error_message: String::new(),
        }
    }
}

impl<Phase: PartialEq> StatusMeta<Phase> {
    /// The debounce comparison spec.md §4.2/§9 requires: compare the fields
    /// that matter (phase, error message presence/text) field-by-field and
    /// skip the write when equal.
    pub fn matches(&self, phase: &Phase, error_message: &str) -> bool {
        &self.phase == phase && self.error_message == error_message
    }
}
