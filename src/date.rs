//! Date normalization between the harvester file format and the repository.
//!
//! Password history files write activation dates as `MM/DD/YYYY`. The
//! password repository keys entries by an ISO-8601 local date-time with a
//! zero time-of-day, e.g. `2024-01-31T00:00:00`. Dates carry no timezone.

use chrono::{Local, NaiveDate};
use thiserror::Error;

/// `strftime` format of the repository's `activeFrom` values.
pub const INTERNAL_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Error returned when an external `MM/DD/YYYY` date cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// The string did not split into month, day and year
    #[error("expected MM/DD/YYYY, got '{input}' ({found} components)")]
    WrongComponentCount { input: String, found: usize },

    /// One of the components is not an integer
    #[error("'{component}' in '{input}' is not a number")]
    NotANumber { input: String, component: String },

    /// All components are numbers but the date does not exist
    #[error("'{input}' is not a valid calendar date")]
    InvalidCalendarDate { input: String },
}

/// Convert an external `MM/DD/YYYY` date to the repository's internal format.
///
/// # Examples
///
/// ```
/// use passwordstore::date::to_internal_date;
///
/// assert_eq!(to_internal_date("01/31/2024").unwrap(), "2024-01-31T00:00:00");
/// assert!(to_internal_date("13/01/2024").is_err());
/// ```
pub fn to_internal_date(external_date: &str) -> Result<String, DateParseError> {
    let components: Vec<&str> = external_date.split('/').collect();
    if components.len() != 3 {
        return Err(DateParseError::WrongComponentCount {
            input: external_date.to_string(),
            found: components.len(),
        });
    }

    let parse = |component: &str| -> Result<i64, DateParseError> {
        component
            .trim()
            .parse::<i64>()
            .map_err(|_| DateParseError::NotANumber {
                input: external_date.to_string(),
                component: component.to_string(),
            })
    };
    let month = parse(components[0])?;
    let day = parse(components[1])?;
    let year = parse(components[2])?;

    let invalid = || DateParseError::InvalidCalendarDate {
        input: external_date.to_string(),
    };
    let year = i32::try_from(year).map_err(|_| invalid())?;
    let month = u32::try_from(month).map_err(|_| invalid())?;
    let day = u32::try_from(day).map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .map(internal_date_from)
        .ok_or_else(invalid)
}

/// Format a calendar date in the internal format.
pub fn internal_date_from(date: NaiveDate) -> String {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .format(INTERNAL_DATE_FORMAT)
        .to_string()
}

/// Today's local calendar date in the internal format.
pub fn today_internal_date() -> String {
    internal_date_from(Local::now().date_naive())
}
