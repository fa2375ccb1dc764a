//! Timestamp serialization for the tracker and team-store files.
//!
//! The on-disk format is the plain `YYYY-MM-DD HH:MM:SS` string the tracker
//! file has always carried; parsing additionally accepts RFC3339 so files
//! touched by other tooling still load.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// On-disk timestamp format.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way the tracker file stores it.
#[must_use]
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(FORMAT).to_string()
}

/// Serialize `DateTime<Utc>` as a `YYYY-MM-DD HH:MM:SS` string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(dt))
}

/// Deserialize from the tracker format or RFC3339.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).ok_or_else(|| Error::custom(format!("Invalid timestamp: {s}")))
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_tracker_format() {
        let ts = parse_timestamp("2025-01-02 03:04:05").unwrap();
        assert_eq!(format_timestamp(&ts), "2025-01-02 03:04:05");
    }

    #[test]
    fn parses_rfc3339() {
        let ts = parse_timestamp("2025-01-02T03:04:05Z").unwrap();
        assert_eq!(format_timestamp(&ts), "2025-01-02 03:04:05");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
