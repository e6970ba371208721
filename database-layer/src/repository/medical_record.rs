use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::filters::DateRange;
use super::memory::{no_constraints, Keyed, MemoryTable};
use crate::error::DatabaseResult;
use crate::models::MedicalRecord;

/// Repository interface for medical records
#[async_trait]
pub trait MedicalRecordRepository: Send + Sync {
    async fn create(&self, record: &MedicalRecord) -> DatabaseResult<()>;

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<MedicalRecord>>;

    async fn update(&self, record: &MedicalRecord) -> DatabaseResult<()>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;

    /// Visits of one patient, most recent first
    async fn list_by_patient(&self, patient_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<MedicalRecord>>;
}

impl Keyed for MedicalRecord {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// In-memory medical record repository for testing and development
#[derive(Debug, Clone, Default)]
pub struct InMemoryMedicalRecordRepository {
    records: Arc<MemoryTable<MedicalRecord>>,
}

impl InMemoryMedicalRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MedicalRecordRepository for InMemoryMedicalRecordRepository {
    async fn create(&self, record: &MedicalRecord) -> DatabaseResult<()> {
        self.records.insert(record.clone(), no_constraints)
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<MedicalRecord>> {
        Ok(self.records.get(id))
    }

    async fn update(&self, record: &MedicalRecord) -> DatabaseResult<()> {
        self.records.replace(record.clone(), no_constraints)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        Ok(self.records.remove(id))
    }

    async fn list_by_patient(&self, patient_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<MedicalRecord>> {
        let mut found = self
            .records
            .filter(|r| r.patient_id == patient_id && range.contains(r.visit_date));
        found.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));
        Ok(found)
    }
}
