//! Wire formatting and parsing of dates and times
//!
//! Appointments keep their date and time as fixed-width text (`YYYY-MM-DD`,
//! `HH:MM`) so that lexical order is chronological order. Parsing here is
//! strict about zero padding for that reason.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use error_common::{ClinicError, Result};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Audit timestamp, `YYYY-MM-DDTHH:MM:SSZ`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Calendar date of a timestamp, `YYYY-MM-DD`
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// # Errors
///
/// Validation error when `value` is not a zero-padded `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let invalid = || ClinicError::validation(format!("{field} must be a date in YYYY-MM-DD format"));
    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// # Errors
///
/// Validation error when `value` is not a zero-padded `HH:MM` time.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime> {
    let invalid = || ClinicError::validation(format!("{field} must be a time in HH:MM format"));
    if value.len() != 5 {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| invalid())
}

/// Optional date filter; absent and empty both mean "no bound".
///
/// # Errors
///
/// Same as [`parse_date`].
pub fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => parse_date(field, v).map(Some),
        _ => Ok(None),
    }
}

/// Midnight UTC of a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Same as [`parse_date`].
pub fn parse_date_as_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    Ok(parse_date(field, value)?.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_audit_timestamps_without_fraction() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(format_timestamp(at), "2025-03-01T09:05:07Z");
        assert_eq!(format_date(at), "2025-03-01");
    }

    #[test]
    fn rejects_unpadded_values() {
        assert!(parse_date("appointment_date", "2025-3-1").is_err());
        assert!(parse_time("appointment_time", "9:00").is_err());
        assert!(parse_time("appointment_time", "25:00").is_err());
        assert_eq!(format_time(parse_time("appointment_time", "09:30").unwrap()), "09:30");
    }

    #[test]
    fn empty_filter_means_unbounded() {
        assert_eq!(parse_optional_date("from_date", Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_date("from_date", None).unwrap(), None);
        assert!(parse_optional_date("from_date", Some("yesterday")).is_err());
    }
}
