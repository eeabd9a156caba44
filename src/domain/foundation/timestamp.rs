//! Timestamp value object for immutable points in time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Immutable point in time, always UTC.
///
/// Accepts both RFC 3339 strings and offset-less ISO strings on input; the
/// research service emits the latter and they are read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the calendar date (UTC).
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Parses either an RFC 3339 string or a naive ISO 8601 date-time.
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(value) {
            Ok(dt) => Ok(Self(dt.with_timezone(&Utc))),
            Err(_) => {
                let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")?;
                Ok(Self(naive.and_utc()))
            }
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_deserializes_rfc3339() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();
        assert_eq!(ts.as_datetime().year(), 2024);
        assert_eq!(ts.as_datetime().hour(), 10);
    }

    #[test]
    fn timestamp_deserializes_naive_iso_as_utc() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00.123456\"").unwrap();
        assert_eq!(ts.as_datetime().day(), 15);
        assert_eq!(ts.as_datetime().minute(), 30);
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
    }

    #[test]
    fn timestamp_serializes_to_rfc3339() {
        let ts = Timestamp::parse("2024-01-15T10:30:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-01-15T10:30:00+00:00\"");
    }

    #[test]
    fn timestamp_date_is_calendar_day() {
        let ts = Timestamp::parse("2024-03-09T23:59:59Z").unwrap();
        assert_eq!(ts.date().to_string(), "2024-03-09");
    }

    #[test]
    fn timestamp_ordering_works() {
        let earlier = Timestamp::parse("2024-01-15T10:30:00Z").unwrap();
        let later = Timestamp::parse("2024-01-15T10:31:00Z").unwrap();
        assert!(earlier < later);
    }
}
