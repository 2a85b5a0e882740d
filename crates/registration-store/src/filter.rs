//! Calendar-day filtering over regional timestamp strings.
//!
//! A requested date selects records whose `registrationTime` starts with the
//! regional rendering of the *following* day. Clients of the admin page rely
//! on this offset: asking for `2024-01-15` returns records stamped
//! `16/1/2024, ...`.

use crate::clock::format_date;
use crate::types::StoredRecord;
use chrono::{Days, NaiveDate};
use tracing::debug;

/// Wire format of the `date` query parameter.
const REQUEST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Selection applied by `find_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    /// Every record.
    All,
    /// Records whose registration time starts with this string.
    RegistrationTimePrefix(String),
    /// No record. Produced for dates that cannot be interpreted.
    Nothing,
}

impl RecordFilter {
    /// Build the filter for an optional `date` query value.
    ///
    /// Absent or blank dates select everything. Unparseable dates select nothing.
    pub fn for_requested_date(date: Option<&str>) -> Self {
        let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
            return RecordFilter::All;
        };

        let Ok(requested) = NaiveDate::parse_from_str(raw, REQUEST_DATE_FORMAT) else {
            debug!(date = %raw, "Unparseable date, filter matches nothing");
            return RecordFilter::Nothing;
        };

        match requested.checked_add_days(Days::new(1)) {
            Some(next_day) => RecordFilter::RegistrationTimePrefix(format_date(next_day)),
            None => RecordFilter::Nothing,
        }
    }

    /// Check whether a record passes the filter.
    pub fn matches(&self, record: &StoredRecord) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::RegistrationTimePrefix(prefix) => {
                record.record.registration_time.starts_with(prefix.as_str())
            }
            RecordFilter::Nothing => false,
        }
    }
}
