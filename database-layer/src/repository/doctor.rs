use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::filters::DoctorSearch;
use super::memory::{Keyed, MemoryTable};
use crate::error::{constraints, DatabaseError, DatabaseResult};
use crate::models::{Doctor, DoctorAvailability};

/// Repository interface for doctors and their weekly availability
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Fails with [`DatabaseError::UniqueViolation`] on a duplicate email, phone number or license.
    async fn create(&self, doctor: &Doctor) -> DatabaseResult<()>;

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Doctor>>;

    async fn update(&self, doctor: &Doctor) -> DatabaseResult<()>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;

    async fn search(&self, filter: &DoctorSearch) -> DatabaseResult<Vec<Doctor>>;

    async fn get_by_email(&self, email: &str) -> DatabaseResult<Option<Doctor>>;

    async fn get_by_phone(&self, phone_number: &str) -> DatabaseResult<Option<Doctor>>;

    async fn get_by_license(&self, license_number: &str) -> DatabaseResult<Option<Doctor>>;

    /// Replaces the doctor's whole availability set; no merging.
    async fn set_availability(&self, doctor_id: Uuid, slots: &[DoctorAvailability]) -> DatabaseResult<()>;

    /// Availability rows in the order they were set
    async fn get_availability(&self, doctor_id: Uuid) -> DatabaseResult<Vec<DoctorAvailability>>;

    /// Atomically bumps `total_consultations` by one.
    async fn increment_consultations(&self, doctor_id: Uuid) -> DatabaseResult<()>;
}

impl Keyed for Doctor {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for DoctorAvailability {
    fn key(&self) -> Uuid {
        self.id
    }
}

fn doctor_uniqueness(existing: &Doctor, candidate: &Doctor) -> Option<&'static str> {
    if existing.email == candidate.email {
        Some(constraints::DOCTOR_EMAIL)
    } else if existing.phone_number == candidate.phone_number {
        Some(constraints::DOCTOR_PHONE)
    } else if existing.license_number == candidate.license_number {
        Some(constraints::DOCTOR_LICENSE)
    } else {
        None
    }
}

/// In-memory doctor repository for testing and development
#[derive(Debug, Clone, Default)]
pub struct InMemoryDoctorRepository {
    doctors: Arc<MemoryTable<Doctor>>,
    availability: Arc<MemoryTable<DoctorAvailability>>,
}

impl InMemoryDoctorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DoctorRepository for InMemoryDoctorRepository {
    async fn create(&self, doctor: &Doctor) -> DatabaseResult<()> {
        self.doctors.insert(doctor.clone(), doctor_uniqueness)
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Doctor>> {
        Ok(self.doctors.get(id))
    }

    async fn update(&self, doctor: &Doctor) -> DatabaseResult<()> {
        self.doctors.replace(doctor.clone(), doctor_uniqueness)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let removed = self.doctors.remove(id);
        if removed {
            self.availability.retain(|slot| slot.doctor_id != id);
        }
        Ok(removed)
    }

    async fn search(&self, filter: &DoctorSearch) -> DatabaseResult<Vec<Doctor>> {
        Ok(self.doctors.filter(|d| filter.matches(d)))
    }

    async fn get_by_email(&self, email: &str) -> DatabaseResult<Option<Doctor>> {
        Ok(self.doctors.find(|d| d.email == email))
    }

    async fn get_by_phone(&self, phone_number: &str) -> DatabaseResult<Option<Doctor>> {
        Ok(self.doctors.find(|d| d.phone_number == phone_number))
    }

    async fn get_by_license(&self, license_number: &str) -> DatabaseResult<Option<Doctor>> {
        Ok(self.doctors.find(|d| d.license_number == license_number))
    }

    async fn set_availability(&self, doctor_id: Uuid, slots: &[DoctorAvailability]) -> DatabaseResult<()> {
        self.availability.retain(|slot| slot.doctor_id != doctor_id);
        self.availability.extend(slots.iter().cloned().map(|mut slot| {
            slot.doctor_id = doctor_id;
            slot
        }));
        Ok(())
    }

    async fn get_availability(&self, doctor_id: Uuid) -> DatabaseResult<Vec<DoctorAvailability>> {
        Ok(self.availability.filter(|slot| slot.doctor_id == doctor_id))
    }

    async fn increment_consultations(&self, doctor_id: Uuid) -> DatabaseResult<()> {
        let updated = self.doctors.modify(doctor_id, |doctor| {
            doctor.total_consultations = doctor.total_consultations.saturating_add(1);
            doctor.updated_at = Utc::now();
        });
        if updated {
            Ok(())
        } else {
            Err(DatabaseError::QueryFailed(format!("doctor {doctor_id} does not exist")))
        }
    }
}
