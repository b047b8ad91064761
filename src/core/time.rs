use chrono::{SecondsFormat, Utc};

/// Current UTC time as an ISO-8601 string. Fixed microsecond width so
/// that lexicographic order matches chronological order in SQL.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
