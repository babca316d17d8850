//! Platform timestamp parsing and "time since posted" arithmetic.

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

use crate::model::ElapsedDuration;

/// `Wed Jul 09 14:32:10 +0000 2025`
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const WEEKDAY_FORMAT: &str = "%a";
const DATE_FORMAT: &str = "%b %d %H:%M:%S %z %Y";

#[derive(Debug, Error)]
#[error("invalid post timestamp {raw:?}: {source}")]
pub struct TimestampError {
    pub raw: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Parse a timestamp in [`CREATED_AT_FORMAT`].
///
/// The leading weekday must be a weekday name but is not checked against the
/// date: `Thu Jul 09 ... 2025` is accepted even though that day is a Wednesday.
pub fn parse_created_at(raw: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    let err = |source| TimestampError {
        raw: raw.to_string(),
        source,
    };
    let (weekday, rest) = raw.split_once(' ').unwrap_or((raw, ""));
    format::parse(&mut Parsed::new(), weekday, StrftimeItems::new(WEEKDAY_FORMAT)).map_err(err)?;
    DateTime::parse_from_str(rest, DATE_FORMAT).map_err(err)
}

/// Breakdown of `now - created`. A creation time after `now` counts as zero.
pub fn elapsed_between(now: DateTime<Utc>, created: DateTime<FixedOffset>) -> ElapsedDuration {
    let delta = now.signed_duration_since(created);
    ElapsedDuration::from_seconds(delta.num_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn parses_platform_format() {
        let ts = parse_created_at("Wed Jul 09 14:32:10 +0000 2025").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 7, 9, 14, 32, 10).unwrap());
    }

    #[test]
    fn honours_utc_offset() {
        let ts = parse_created_at("Wed Jul 09 16:32:10 +0200 2025").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 7, 9, 14, 32, 10).unwrap());
    }

    #[test]
    fn weekday_is_not_checked_against_date() {
        let ts = parse_created_at("Thu Jul 09 14:32:10 +0000 2025").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 7, 9, 14, 32, 10).unwrap());
    }

    #[test]
    fn rejects_other_formats() {
        for raw in [
            "2025-07-09T14:32:10Z",
            "",
            "Wed Jul 09 14:32:10 2025",
            "yesterday",
            "Xyz Jul 09 14:32:10 +0000 2025",
            "Jul 09 14:32:10 +0000 2025",
        ] {
            let err = parse_created_at(raw).unwrap_err();
            assert_eq!(err.raw, raw);
            assert!(err.to_string().contains("invalid post timestamp"));
        }
    }

    #[test]
    fn truncates_to_whole_minutes() {
        let now = Utc.with_ymd_and_hms(2025, 7, 10, 15, 33, 11).unwrap();
        let created: DateTime<FixedOffset> = (now - Duration::seconds(90_061)).into();
        assert_eq!(elapsed_between(now, created).to_string(), "1d 1h 1m ago");

        let created: DateTime<FixedOffset> = (now - Duration::seconds(90_060 + 59)).into();
        assert_eq!(elapsed_between(now, created).to_string(), "1d 1h 1m ago");
    }

    #[test]
    fn future_post_is_zero() {
        let now = Utc.with_ymd_and_hms(2025, 7, 9, 14, 0, 0).unwrap();
        let created = parse_created_at("Wed Jul 09 14:32:10 +0000 2025").unwrap();
        assert_eq!(elapsed_between(now, created), ElapsedDuration::default());
    }

    #[test]
    fn measures_parsed_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 7, 12, 16, 40, 30).unwrap();
        let created = parse_created_at("Wed Jul 09 14:32:10 +0000 2025").unwrap();
        assert_eq!(elapsed_between(now, created).to_string(), "3d 2h 8m ago");
    }
}
