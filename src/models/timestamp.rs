use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g. `2024-05-01T00:00:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
