use thiserror::Error;

/// Names of the unique indexes created by the migrations.
///
/// The in-memory repositories report the same names so callers can map a
/// violation to a message without caring about the backend.
pub mod constraints {
    pub const PATIENT_EMAIL: &str = "uq_patients_email";
    pub const PATIENT_PHONE: &str = "uq_patients_phone_number";
    pub const DOCTOR_EMAIL: &str = "uq_doctors_email";
    pub const DOCTOR_PHONE: &str = "uq_doctors_phone_number";
    pub const DOCTOR_LICENSE: &str = "uq_doctors_license_number";
    pub const APPOINTMENT_ACTIVE_SLOT: &str = "uq_appointments_active_slot";
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Invalid stored value in column {column}: {message}")]
    Encoding { column: &'static str, message: String },

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Database error: {0}")]
    SqlxError(sqlx::Error),
}

impl DatabaseError {
    pub fn encoding(column: &'static str, message: impl ToString) -> Self {
        Self::Encoding {
            column,
            message: message.to_string(),
        }
    }

    /// Name of the violated unique index, if this is a uniqueness failure
    pub fn violated_constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint } => Some(constraint.as_str()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        Self::SqlxError(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::MigrationError(err.to_string())
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_exposes_constraint() {
        let err = DatabaseError::UniqueViolation {
            constraint: constraints::PATIENT_EMAIL.to_string(),
        };
        assert_eq!(err.violated_constraint(), Some(constraints::PATIENT_EMAIL));
        assert_eq!(DatabaseError::QueryFailed("x".into()).violated_constraint(), None);
    }

    #[test]
    fn row_not_found_is_not_a_unique_violation() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DatabaseError::SqlxError(sqlx::Error::RowNotFound)));
    }
}
