use std::error::Error as StdError;

use serde::Serialize;
use thiserror::Error;

use crate::codes;

/// Boxed source error kept on storage failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Domain error shared by every business service
#[derive(Error, Debug)]
pub enum ClinicError {
    /// A required request field is empty
    #[error("{0}")]
    MissingField(String),

    /// A field is present but malformed
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A uniqueness rule rejects the write (email, phone, license)
    #[error("{0}")]
    AlreadyExists(String),

    /// The requested time slot is occupied
    #[error("{0}")]
    Conflict(String),

    /// The appointment status forbids the requested action
    #[error("{0}")]
    InvalidTransition(String),

    /// The backing store failed
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: BoxError,
    },
}

/// Coarse error category, stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyExists,
    Conflict,
    InvalidTransition,
    Storage,
}

impl ClinicError {
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::MissingField(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition(message.into())
    }

    pub fn storage(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Storage {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_) | Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidTransition(_) => ErrorKind::InvalidTransition,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Error code reported alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => codes::validation::MISSING_REQUIRED_FIELD,
            Self::Validation(_) => codes::validation::INVALID_INPUT,
            Self::NotFound { .. } => codes::resource::NOT_FOUND,
            Self::AlreadyExists(_) => codes::resource::ALREADY_EXISTS,
            Self::Conflict(_) => codes::scheduling::SLOT_CONFLICT,
            Self::InvalidTransition(_) => codes::scheduling::INVALID_STATUS_TRANSITION,
            Self::Storage { .. } => codes::database::STORAGE_FAILURE,
        }
    }

    /// Message safe to hand to an API consumer
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage { context, .. } => context.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for clinic operations
pub type Result<T> = std::result::Result<T, ClinicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_entity() {
        let err = ClinicError::not_found("appointment");
        assert_eq!(err.to_string(), "appointment not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), codes::resource::NOT_FOUND);
    }

    #[test]
    fn storage_error_keeps_source_but_hides_it_publicly() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = ClinicError::storage("failed to create patient", io);

        assert_eq!(err.to_string(), "failed to create patient: connection reset");
        assert_eq!(err.public_message(), "failed to create patient");
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_field_and_validation_share_a_kind() {
        assert_eq!(
            ClinicError::missing_field("patient_id is required").kind(),
            ClinicError::validation("bad date").kind()
        );
    }
}
