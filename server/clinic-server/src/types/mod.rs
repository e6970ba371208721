//! Request and response shapes shared by the HTTP and gRPC transports
//!
//! JSON bodies deserialize straight into these types; the gRPC layer converts
//! its generated messages into them (see `grpc::convert`). Services only ever
//! see these shapes.

pub mod appointment;
pub mod doctor;
pub mod patient;
pub mod prescription;

pub use appointment::*;
pub use doctor::*;
pub use patient::*;
pub use prescription::*;

use database_layer::repository::DateRange;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::utils::timestamps::parse_optional_date;

/// Inclusive `from_date` / `to_date` filter used by history and prescription listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct DateRangeQuery {
    /// Earliest day to include, `YYYY-MM-DD`
    #[param(example = "2025-01-01")]
    pub from_date: Option<String>,
    /// Last day to include, `YYYY-MM-DD`
    #[param(example = "2025-12-31")]
    pub to_date: Option<String>,
}

impl DateRangeQuery {
    /// # Errors
    ///
    /// Validation error when either bound is not a `YYYY-MM-DD` date.
    pub fn to_range(&self) -> error_common::Result<DateRange> {
        Ok(DateRange::new(
            parse_optional_date("from_date", self.from_date.as_deref())?,
            parse_optional_date("to_date", self.to_date.as_deref())?,
        ))
    }
}

/// Blank strings coming from optional filters mean "not set"
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn range_query_parses_both_bounds() {
        let query = DateRangeQuery {
            from_date: Some("2025-01-01".into()),
            to_date: Some("2025-01-31".into()),
        };
        let range = query.to_range().unwrap();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(range.to, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn range_query_rejects_bad_dates() {
        let query = DateRangeQuery {
            from_date: Some("01/01/2025".into()),
            to_date: None,
        };
        assert_eq!(
            query.to_range().unwrap_err().to_string(),
            "from_date must be a date in YYYY-MM-DD format"
        );
    }

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" smith ")), Some("smith".to_string()));
    }
}
