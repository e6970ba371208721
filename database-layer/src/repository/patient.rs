use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::filters::PatientSearch;
use super::memory::{Keyed, MemoryTable};
use crate::error::{constraints, DatabaseResult};
use crate::models::Patient;

/// Repository interface for patients
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Fails with [`crate::DatabaseError::UniqueViolation`] on a duplicate email or phone number.
    async fn create(&self, patient: &Patient) -> DatabaseResult<()>;

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Patient>>;

    /// Overwrites every column of an existing patient.
    async fn update(&self, patient: &Patient) -> DatabaseResult<()>;

    /// Returns whether a row was deleted
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;

    /// Matching patients in registration order
    async fn search(&self, filter: &PatientSearch) -> DatabaseResult<Vec<Patient>>;

    async fn get_by_email(&self, email: &str) -> DatabaseResult<Option<Patient>>;

    async fn get_by_phone(&self, phone_number: &str) -> DatabaseResult<Option<Patient>>;
}

impl Keyed for Patient {
    fn key(&self) -> Uuid {
        self.id
    }
}

fn patient_uniqueness(existing: &Patient, candidate: &Patient) -> Option<&'static str> {
    if existing.email == candidate.email {
        Some(constraints::PATIENT_EMAIL)
    } else if existing.phone_number == candidate.phone_number {
        Some(constraints::PATIENT_PHONE)
    } else {
        None
    }
}

/// In-memory patient repository for testing and development
#[derive(Debug, Clone, Default)]
pub struct InMemoryPatientRepository {
    patients: Arc<MemoryTable<Patient>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn create(&self, patient: &Patient) -> DatabaseResult<()> {
        self.patients.insert(patient.clone(), patient_uniqueness)
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Patient>> {
        Ok(self.patients.get(id))
    }

    async fn update(&self, patient: &Patient) -> DatabaseResult<()> {
        self.patients.replace(patient.clone(), patient_uniqueness)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        Ok(self.patients.remove(id))
    }

    async fn search(&self, filter: &PatientSearch) -> DatabaseResult<Vec<Patient>> {
        Ok(self.patients.filter(|p| filter.matches(p)))
    }

    async fn get_by_email(&self, email: &str) -> DatabaseResult<Option<Patient>> {
        Ok(self.patients.find(|p| p.email == email))
    }

    async fn get_by_phone(&self, phone_number: &str) -> DatabaseResult<Option<Patient>> {
        Ok(self.patients.find(|p| p.phone_number == phone_number))
    }
}

