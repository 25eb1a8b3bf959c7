//! Time Utilities

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp as an RFC 3339 string, keeping sub-second precision.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 strings with an offset, and naive `YYYY-MM-DDTHH:MM:SS[.fff]`
/// strings, which are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde adapter for entry timestamps.
pub mod timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid ISO-8601 timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_format_parse_roundtrip_is_exact() {
        let now = now_utc();
        let parsed = parse_timestamp(&format_timestamp(&now)).unwrap();
        assert_eq!(now, parsed);
    }

    #[test]
    fn test_parse_naive_isoformat() {
        let dt = parse_timestamp("2024-01-15T10:30:00.123456").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.nanosecond(), 123_456_000);

        let dt = parse_timestamp("2024-01-15T10:30:00").unwrap();
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_with_offset() {
        let dt = parse_timestamp("2024-01-15T12:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
