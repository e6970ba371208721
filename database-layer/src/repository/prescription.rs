use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::filters::DateRange;
use super::memory::{no_constraints, Keyed, MemoryTable};
use crate::error::DatabaseResult;
use crate::models::Prescription;

/// Repository interface for prescriptions
///
/// Rows come back exactly as stored; expiry is derived by the caller.
#[async_trait]
pub trait PrescriptionRepository: Send + Sync {
    async fn create(&self, prescription: &Prescription) -> DatabaseResult<()>;

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Prescription>>;

    /// Ordered by prescription date, newest first
    async fn list_by_patient(&self, patient_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<Prescription>>;

    /// Ordered by prescription date, newest first
    async fn list_by_doctor(&self, doctor_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<Prescription>>;

    async fn get_by_appointment(&self, appointment_id: Uuid) -> DatabaseResult<Option<Prescription>>;
}

impl Keyed for Prescription {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// In-memory prescription repository for testing and development
#[derive(Debug, Clone, Default)]
pub struct InMemoryPrescriptionRepository {
    prescriptions: Arc<MemoryTable<Prescription>>,
}

impl InMemoryPrescriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, matches: impl Fn(&Prescription) -> bool, range: &DateRange) -> Vec<Prescription> {
        let mut found = self
            .prescriptions
            .filter(|p| matches(p) && range.contains(p.prescription_date));
        found.sort_by(|a, b| b.prescription_date.cmp(&a.prescription_date));
        found
    }
}

#[async_trait]
impl PrescriptionRepository for InMemoryPrescriptionRepository {
    async fn create(&self, prescription: &Prescription) -> DatabaseResult<()> {
        self.prescriptions.insert(prescription.clone(), no_constraints)
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Prescription>> {
        Ok(self.prescriptions.get(id))
    }

    async fn list_by_patient(&self, patient_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<Prescription>> {
        Ok(self.list(|p| p.patient_id == patient_id, range))
    }

    async fn list_by_doctor(&self, doctor_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<Prescription>> {
        Ok(self.list(|p| p.doctor_id == doctor_id, range))
    }

    async fn get_by_appointment(&self, appointment_id: Uuid) -> DatabaseResult<Option<Prescription>> {
        Ok(self
            .prescriptions
            .find(|p| p.appointment_id == Some(appointment_id)))
    }
}
