//! Request validation shared by the HTTP and gRPC transports
//!
//! Request types implement [`RequestValidation`]; services call `validate()`
//! before touching a repository, so both transports reject a malformed
//! request with the same message.

use error_common::{ClinicError, Result};
use uuid::Uuid;

/// Trait for validating request payloads
pub trait RequestValidation {
    /// # Errors
    ///
    /// Returns the first rule the request breaks.
    fn validate(&self) -> Result<()>;
}

/// Returns `$error` from the enclosing function unless `$predicate` holds
///
/// # Usage
///
/// ```rust,ignore
/// validate_field!(!self.medications.is_empty(), ClinicError::missing_field("at least one medication is required"));
/// ```
#[macro_export]
macro_rules! validate_field {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

/// Requires every listed string to be non-blank, failing with one message
///
/// # Usage
///
/// ```rust,ignore
/// validate_required!("patient_id and doctor_id are required", self.patient_id, self.doctor_id);
/// ```
#[macro_export]
macro_rules! validate_required {
    ($message:expr, $($field:expr),+ $(,)?) => {
        $crate::validate_field!(
            $(!$field.trim().is_empty())&&+,
            ::error_common::ClinicError::missing_field($message)
        );
    };
}

/// Parses an identifier field.
///
/// # Errors
///
/// `"<field> is required"` when blank, `"<field> must be a valid UUID"` when malformed.
pub fn parse_id(field: &str, value: &str) -> Result<Uuid> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClinicError::missing_field(format!("{field} is required")));
    }
    Uuid::parse_str(value).map_err(|_| ClinicError::validation(format!("{field} must be a valid UUID")))
}

/// Like [`parse_id`] for optional references; blank means absent.
///
/// # Errors
///
/// `"<field> must be a valid UUID"` when present but malformed.
pub fn parse_optional_id(field: &str, value: Option<&str>) -> Result<Option<Uuid>> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => parse_id(field, v).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error_common::ErrorKind;

    struct Booking {
        patient_id: String,
        doctor_id: String,
        slots: u32,
    }

    impl RequestValidation for Booking {
        fn validate(&self) -> Result<()> {
            validate_required!("patient_id and doctor_id are required", self.patient_id, self.doctor_id);
            validate_field!(self.slots > 0, ClinicError::validation("slots must be positive"));
            Ok(())
        }
    }

    #[test]
    fn required_fields_share_one_message() {
        let err = Booking {
            patient_id: "p".into(),
            doctor_id: "  ".into(),
            slots: 1,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "patient_id and doctor_id are required");
        assert!(matches!(err, ClinicError::MissingField(_)));
    }

    #[test]
    fn predicates_run_after_required_fields() {
        let err = Booking {
            patient_id: "p".into(),
            doctor_id: "d".into(),
            slots: 0,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "slots must be positive");
    }

    #[test]
    fn ids_distinguish_missing_from_malformed() {
        assert_eq!(parse_id("doctor_id", "").unwrap_err().to_string(), "doctor_id is required");
        assert_eq!(
            parse_id("doctor_id", "not-a-uuid").unwrap_err().to_string(),
            "doctor_id must be a valid UUID"
        );
        let id = Uuid::new_v4();
        assert_eq!(parse_id("doctor_id", &id.to_string()).unwrap(), id);
        assert_eq!(parse_optional_id("appointment_id", Some("")).unwrap(), None);
    }
}
