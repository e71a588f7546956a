//! Timestamp handling for schedule items and file records.
//!
//! Upstream records carry times either as RFC 3339 timestamps or as
//! date-only strings (all-day events, task due dates). Anything else is
//! carried through unchanged as [`ItemTime::Raw`] rather than rejected:
//! such values simply never resolve to an instant, so they can never
//! satisfy the matcher, but the record they belong to is preserved.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in time as reported by an upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemTime {
    /// Full RFC 3339 timestamp, normalized to UTC.
    Timestamp(DateTime<Utc>),
    /// Date-only value (all-day events, dateless due dates).
    Date(NaiveDate),
    /// Unparseable input, preserved verbatim.
    Raw(String),
}

impl ItemTime {
    /// Parses an upstream time string: RFC 3339 first, then `%Y-%m-%d`.
    pub fn parse(input: &str) -> Self {
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Self::Timestamp(dt.with_timezone(&Utc));
        }
        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Self::Date(date);
        }
        Self::Raw(input.to_string())
    }

    /// Builds an `ItemTime` from the Calendar API's `{dateTime, date}` pair,
    /// preferring the timed field. When both are absent the result is an
    /// empty `Raw` value that never resolves.
    pub fn from_api_fields(date_time: Option<&str>, date: Option<&str>) -> Self {
        match (date_time, date) {
            (Some(dt), _) => Self::parse(dt),
            (None, Some(d)) => Self::parse(d),
            (None, None) => Self::Raw(String::new()),
        }
    }

    /// Wraps an already-known UTC instant.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::Timestamp(dt)
    }

    /// Resolves to an instant, if possible.
    ///
    /// Date-only values resolve to midnight UTC. `Raw` values resolve to
    /// nothing and therefore never match a time window.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(dt) => Some(*dt),
            Self::Date(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive)),
            Self::Raw(_) => None,
        }
    }

    /// Returns true if this value carries no usable instant.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

impl Default for ItemTime {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

impl fmt::Display for ItemTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Raw(s) => f.write_str(s),
        }
    }
}

impl Serialize for ItemTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let t = ItemTime::parse("2024-01-10T10:00:00Z");
        assert_eq!(
            t.instant(),
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let t = ItemTime::parse("2024-01-10T12:00:00+02:00");
        assert_eq!(
            t.instant(),
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn parses_date_only_as_midnight_utc() {
        let t = ItemTime::parse("2024-01-10");
        assert_eq!(t, ItemTime::Date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()));
        assert_eq!(
            t.instant(),
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn garbage_is_preserved_and_never_resolves() {
        let t = ItemTime::parse("not a timestamp");
        assert!(t.is_raw());
        assert_eq!(t.instant(), None);
        assert_eq!(t.to_string(), "not a timestamp");
    }

    #[test]
    fn from_api_fields_prefers_timed_field() {
        let t = ItemTime::from_api_fields(Some("2024-01-10T10:00:00Z"), Some("2024-01-10"));
        assert!(matches!(t, ItemTime::Timestamp(_)));

        let t = ItemTime::from_api_fields(None, Some("2024-01-10"));
        assert!(matches!(t, ItemTime::Date(_)));

        let t = ItemTime::from_api_fields(None, None);
        assert!(t.is_raw());
    }

    #[test]
    fn serde_roundtrip_keeps_string_form() {
        let t = ItemTime::parse("2024-01-10T10:00:00Z");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#""2024-01-10T10:00:00Z""#);

        let parsed: ItemTime = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, t);

        let raw = ItemTime::parse("whenever");
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(json, r#""whenever""#);
        let parsed: ItemTime = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, raw);
    }
}
