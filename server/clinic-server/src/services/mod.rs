//! Business services
//!
//! One service per entity family. A service validates the request, checks
//! the business rules against its repositories and shapes the response.
//! Transports (axum handlers, tonic services) call into these and only map
//! errors to their own status codes.

pub mod appointment_service;
pub mod doctor_service;
pub mod patient_service;
pub mod prescription_service;
pub mod scheduling;

pub use appointment_service::AppointmentService;
pub use doctor_service::DoctorService;
pub use patient_service::PatientService;
pub use prescription_service::PrescriptionService;

use std::sync::Arc;

use database_layer::{
    constraints,
    repository::{
        postgres::{
            PostgresAppointmentRepository, PostgresDoctorRepository, PostgresMedicalRecordRepository,
            PostgresPatientRepository, PostgresPrescriptionRepository,
        },
        AppointmentRepository, DoctorRepository, InMemoryAppointmentRepository, InMemoryDoctorRepository,
        InMemoryMedicalRecordRepository, InMemoryPatientRepository, InMemoryPrescriptionRepository,
        MedicalRecordRepository, PatientRepository, PrescriptionRepository,
    },
    DatabaseError, Doctor, Patient,
};
use error_common::{ClinicError, Result, StorageContext};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository handles shared by the services
#[derive(Clone)]
pub struct Repositories {
    pub patients: Arc<dyn PatientRepository>,
    pub doctors: Arc<dyn DoctorRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub prescriptions: Arc<dyn PrescriptionRepository>,
    pub medical_records: Arc<dyn MedicalRecordRepository>,
}

impl Repositories {
    /// Process-local storage for development and tests
    pub fn in_memory() -> Self {
        Self {
            patients: Arc::new(InMemoryPatientRepository::new()),
            doctors: Arc::new(InMemoryDoctorRepository::new()),
            appointments: Arc::new(InMemoryAppointmentRepository::new()),
            prescriptions: Arc::new(InMemoryPrescriptionRepository::new()),
            medical_records: Arc::new(InMemoryMedicalRecordRepository::new()),
        }
    }

    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            patients: Arc::new(PostgresPatientRepository::new(pool.clone())),
            doctors: Arc::new(PostgresDoctorRepository::new(pool.clone())),
            appointments: Arc::new(PostgresAppointmentRepository::new(pool.clone())),
            prescriptions: Arc::new(PostgresPrescriptionRepository::new(pool.clone())),
            medical_records: Arc::new(PostgresMedicalRecordRepository::new(pool.clone())),
        }
    }
}

/// Translates a failed write. Unique-index violations get the same message
/// the pre-insert lookups produce; anything else is a storage failure.
pub(crate) fn write_failure(err: DatabaseError, context: &str) -> ClinicError {
    match err.violated_constraint() {
        Some(constraints::PATIENT_EMAIL | constraints::DOCTOR_EMAIL) => {
            ClinicError::already_exists("email already registered")
        }
        Some(constraints::PATIENT_PHONE | constraints::DOCTOR_PHONE) => {
            ClinicError::already_exists("phone number already registered")
        }
        Some(constraints::DOCTOR_LICENSE) => ClinicError::already_exists("license number already registered"),
        Some(constraints::APPOINTMENT_ACTIVE_SLOT) => ClinicError::conflict("time slot is already booked"),
        _ => {
            tracing::error!(context = context, error = %err, "storage write failed");
            ClinicError::storage(context, err)
        }
    }
}

pub(crate) async fn require_patient(patients: &dyn PatientRepository, id: Uuid) -> Result<Patient> {
    patients
        .get(id)
        .await
        .storage_context("failed to get patient")?
        .ok_or(ClinicError::not_found("patient"))
}

pub(crate) async fn require_doctor(doctors: &dyn DoctorRepository, id: Uuid) -> Result<Doctor> {
    doctors
        .get(id)
        .await
        .storage_context("failed to get doctor")?
        .ok_or(ClinicError::not_found("doctor"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use error_common::ErrorKind;

    fn violation(constraint: &str) -> DatabaseError {
        DatabaseError::UniqueViolation {
            constraint: constraint.to_string(),
        }
    }

    #[test]
    fn unique_violations_read_like_the_pre_checks() {
        let err = write_failure(violation(constraints::DOCTOR_LICENSE), "failed to create doctor");
        assert_eq!(err.to_string(), "license number already registered");
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let err = write_failure(violation(constraints::APPOINTMENT_ACTIVE_SLOT), "failed to create appointment");
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn other_failures_are_storage_errors() {
        let err = write_failure(DatabaseError::QueryFailed("boom".into()), "failed to update patient");
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.public_message(), "failed to update patient");
    }
}
