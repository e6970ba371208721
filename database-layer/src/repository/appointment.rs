use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::filters::AppointmentFilter;
use super::memory::{Keyed, MemoryTable};
use crate::error::{constraints, DatabaseResult};
use crate::models::Appointment;

/// Repository interface for appointments
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Fails with [`crate::DatabaseError::UniqueViolation`] when another
    /// non-cancelled appointment holds the same doctor, date and time.
    async fn create(&self, appointment: &Appointment) -> DatabaseResult<()>;

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Appointment>>;

    async fn update(&self, appointment: &Appointment) -> DatabaseResult<()>;

    /// Newest first: date DESC, then time DESC
    async fn list_by_patient(&self, patient_id: Uuid, filter: &AppointmentFilter) -> DatabaseResult<Vec<Appointment>>;

    /// Newest first: date DESC, then time DESC
    async fn list_by_doctor(&self, doctor_id: Uuid, filter: &AppointmentFilter) -> DatabaseResult<Vec<Appointment>>;

    /// Non-cancelled appointments of one day, earliest first
    async fn list_by_doctor_and_date(&self, doctor_id: Uuid, date: &str) -> DatabaseResult<Vec<Appointment>>;

    /// First non-cancelled appointment occupying the slot, ignoring `exclude_id`
    async fn check_conflict(
        &self,
        doctor_id: Uuid,
        date: &str,
        time: &str,
        exclude_id: Option<Uuid>,
    ) -> DatabaseResult<Option<Appointment>>;
}

impl Keyed for Appointment {
    fn key(&self) -> Uuid {
        self.id
    }
}

fn active_slot_uniqueness(existing: &Appointment, candidate: &Appointment) -> Option<&'static str> {
    (candidate.status.blocks_slot()
        && existing.occupies(candidate.doctor_id, &candidate.appointment_date, &candidate.appointment_time))
        .then_some(constraints::APPOINTMENT_ACTIVE_SLOT)
}

fn newest_first(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| {
        (&b.appointment_date, &b.appointment_time).cmp(&(&a.appointment_date, &a.appointment_time))
    });
}

/// In-memory appointment repository for testing and development
#[derive(Debug, Clone, Default)]
pub struct InMemoryAppointmentRepository {
    appointments: Arc<MemoryTable<Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> DatabaseResult<()> {
        self.appointments.insert(appointment.clone(), active_slot_uniqueness)
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Appointment>> {
        Ok(self.appointments.get(id))
    }

    async fn update(&self, appointment: &Appointment) -> DatabaseResult<()> {
        self.appointments.replace(appointment.clone(), active_slot_uniqueness)
    }

    async fn list_by_patient(&self, patient_id: Uuid, filter: &AppointmentFilter) -> DatabaseResult<Vec<Appointment>> {
        let mut found = self
            .appointments
            .filter(|a| a.patient_id == patient_id && filter.matches(a));
        newest_first(&mut found);
        Ok(found)
    }

    async fn list_by_doctor(&self, doctor_id: Uuid, filter: &AppointmentFilter) -> DatabaseResult<Vec<Appointment>> {
        let mut found = self
            .appointments
            .filter(|a| a.doctor_id == doctor_id && filter.matches(a));
        newest_first(&mut found);
        Ok(found)
    }

    async fn list_by_doctor_and_date(&self, doctor_id: Uuid, date: &str) -> DatabaseResult<Vec<Appointment>> {
        let mut found = self.appointments.filter(|a| {
            a.doctor_id == doctor_id && a.appointment_date == date && a.status.blocks_slot()
        });
        found.sort_by(|a, b| a.appointment_time.cmp(&b.appointment_time));
        Ok(found)
    }

    async fn check_conflict(
        &self,
        doctor_id: Uuid,
        date: &str,
        time: &str,
        exclude_id: Option<Uuid>,
    ) -> DatabaseResult<Option<Appointment>> {
        Ok(self
            .appointments
            .find(|a| a.occupies(doctor_id, date, time) && Some(a.id) != exclude_id))
    }
}

