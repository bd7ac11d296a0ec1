//! Lenient parsing for server-provided timestamps.
//!
//! RFC 3339 first. Offset-less ISO 8601 and SQL-style values are read as UTC,
//! numbers as Unix milliseconds, and anything else as `None`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// `deserialize_with` target for optional timestamp fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Millis(i64),
        Other(IgnoredAny),
    }

    Ok(match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(text) => parse(&text),
        RawTimestamp::Millis(millis) => DateTime::from_timestamp_millis(millis),
        RawTimestamp::Other(_) => None,
    })
}

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn reads_rfc3339_with_any_offset() {
        assert_eq!(
            parse("2024-05-01T12:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn reads_offsetless_values_as_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(parse("2024-05-01T10:00:00.123456"), Some(expected));
        assert_eq!(
            parse("2024-05-01 10:00:00"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn unreadable_values_are_dropped() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("yesterday"), None);
    }
}
