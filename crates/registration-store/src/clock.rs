//! Regional clock and `en-IN` style rendering of timestamps.
//!
//! Registration times are stored as display strings in India Standard Time.
//! IST has no daylight saving, so a fixed `+05:30` offset is exact.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Offset of India Standard Time from UTC, in seconds.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Timestamp layout, e.g. `16/1/2024, 9:05:03 am`.
const TIMESTAMP_FORMAT: &str = "%-d/%-m/%Y, %-I:%M:%S %P";

/// Date layout, e.g. `16/1/2024`. Always a prefix of [`TIMESTAMP_FORMAT`].
const DATE_FORMAT: &str = "%-d/%-m/%Y";

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The fixed regional offset.
pub fn region_offset() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is within +/-24h")
}

/// Render an instant as a regional timestamp string.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&region_offset())
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Render a calendar date the way it prefixes a regional timestamp.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_morning() {
        // 03:35:03 UTC is 09:05:03 IST
        let instant = Utc.with_ymd_and_hms(2024, 1, 16, 3, 35, 3).unwrap();
        assert_eq!(format_timestamp(instant), "16/1/2024, 9:05:03 am");
    }

    #[test]
    fn test_format_timestamp_afternoon() {
        let instant = Utc.with_ymd_and_hms(2024, 11, 5, 10, 0, 0).unwrap();
        assert_eq!(format_timestamp(instant), "5/11/2024, 3:30:00 pm");
    }

    #[test]
    fn test_format_timestamp_crosses_midnight() {
        // 18:30 UTC is midnight of the following day in IST
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 18, 30, 0).unwrap();
        assert_eq!(format_timestamp(instant), "16/1/2024, 12:00:00 am");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        assert_eq!(format_date(date), "16/1/2024");

        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(format_date(date), "31/12/2024");
    }

    #[test]
    fn test_timestamp_starts_with_date() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 20, 15, 0).unwrap();
        let local_date = instant.with_timezone(&region_offset()).date_naive();
        assert!(format_timestamp(instant).starts_with(&format_date(local_date)));
    }

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
