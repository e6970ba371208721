use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::coded_enum;

coded_enum! {
    /// Lifecycle state of an appointment. `Cancelled` and `Completed` are terminal.
    pub enum AppointmentStatus {
        Scheduled = 1,
        Confirmed = 2,
        InProgress = 3,
        Completed = 4,
        Cancelled = 5,
        NoShow = 6,
        Rescheduled = 7,
    }
}

coded_enum! {
    pub enum ConsultationType {
        Unspecified = 0,
        InPerson = 1,
        Video = 2,
        Phone = 3,
    }
}

impl Default for ConsultationType {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl AppointmentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether the appointment still occupies its doctor's time slot
    pub fn blocks_slot(self) -> bool {
        self != Self::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    /// `YYYY-MM-DD`
    pub appointment_date: String,
    /// `HH:MM`
    pub appointment_time: String,
    pub status: AppointmentStatus,
    pub consultation_type: ConsultationType,
    pub reason_for_visit: String,
    pub notes: String,
    pub diagnosis: String,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn occupies(&self, doctor_id: Uuid, date: &str, time: &str) -> bool {
        self.status.blocks_slot()
            && self.doctor_id == doctor_id
            && self.appointment_date == date
            && self.appointment_time == time
    }
}
