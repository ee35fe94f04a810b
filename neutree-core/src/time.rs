use chrono::{DateTime, SecondsFormat, Utc};

/// Renders a high-precision RFC3339 timestamp, matching the
/// "high-precision RFC-style timestamp" `last_transition_time` format
/// required by spec.md §4.2.
pub fn rfc3339_now() -> DateTime<Utc> {
    Utc::now()
}

pub fn format_rfc3339_micros(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
