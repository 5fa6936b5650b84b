//! Serde support for the record store's timestamp format.
//!
//! Records carry `created`/`updated` as `2024-05-01 13:45:10.123Z`. RFC 3339
//! is accepted as well, and empty strings read as absent (partial snapshots
//! such as cart entries often have no timestamps).

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const STORE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.fZ";

/// Parse a timestamp in either the store format or RFC 3339.
#[must_use]
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(value, STORE_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)))
        .ok()
}

/// Format a timestamp the way the store does.
#[must_use]
pub fn format(value: &DateTime<Utc>) -> String {
    value
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replacen('T', " ", 1)
}

/// `#[serde(with = "...")]` adapter for `Option<DateTime<Utc>>`.
pub mod optional {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc};

    /// Serialize in store format, or as an empty string when absent.
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&super::format(dt)),
            None => serializer.serialize_str(""),
        }
    }

    /// Deserialize from a string, treating null, empty and unparsable values as absent.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_parse_store_format() {
        let dt = parse("2025-12-10 13:45:10.123Z");
        assert!(dt.is_some());
        let dt = dt.unwrap_or_default();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.hour(), 13);
    }

    #[test]
    fn test_parse_rfc3339_and_empty() {
        assert!(parse("2025-12-10T13:45:10Z").is_some());
        assert!(parse("").is_none());
        assert!(parse("ayer").is_none());
    }

    #[test]
    fn test_format_matches_store() {
        let dt = parse("2025-12-10 13:45:10.123Z").unwrap_or_default();
        assert_eq!(format(&dt), "2025-12-10 13:45:10.123Z");
    }
}
