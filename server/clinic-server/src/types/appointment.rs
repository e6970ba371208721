use database_layer::{Appointment, AppointmentStatus, ConsultationType};
use error_common::Result;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::utils::timestamps::{format_timestamp, parse_date, parse_time};
use crate::validate_required;
use crate::validation::RequestValidation;

/// Book appointment request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookAppointmentRequest {
    pub patient_id: String,
    pub doctor_id: String,
    #[schema(example = "2025-03-01")]
    pub appointment_date: String,
    #[schema(example = "10:00")]
    pub appointment_time: String,
    pub consultation_type: ConsultationType,
    pub reason_for_visit: String,
    pub notes: String,
}

impl RequestValidation for BookAppointmentRequest {
    fn validate(&self) -> Result<()> {
        validate_required!("patient_id and doctor_id are required", self.patient_id, self.doctor_id);
        validate_required!(
            "appointment_date and appointment_time are required",
            self.appointment_date,
            self.appointment_time
        );
        parse_date("appointment_date", &self.appointment_date)?;
        parse_time("appointment_time", &self.appointment_time)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CancelAppointmentRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RescheduleAppointmentRequest {
    #[schema(example = "2025-03-02")]
    pub new_appointment_date: String,
    #[schema(example = "14:30")]
    pub new_appointment_time: String,
    /// Appended to the appointment notes when not empty
    pub reason: String,
}

impl RequestValidation for RescheduleAppointmentRequest {
    fn validate(&self) -> Result<()> {
        validate_required!(
            "new_appointment_date and new_appointment_time are required",
            self.new_appointment_date,
            self.new_appointment_time
        );
        parse_date("new_appointment_date", &self.new_appointment_date)?;
        parse_time("new_appointment_time", &self.new_appointment_time)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CompleteAppointmentRequest {
    pub diagnosis: String,
    /// Replaces the existing notes when not empty
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct AvailableSlotsQuery {
    /// Day to inspect, `YYYY-MM-DD`
    #[param(example = "2025-03-01")]
    pub date: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct PatientAppointmentsQuery {
    pub status: Option<AppointmentStatus>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct DoctorAppointmentsQuery {
    pub status: Option<AppointmentStatus>,
    /// Single day, `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeSlot {
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "09:30")]
    pub end_time: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailableSlotsResponse {
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: String,
    pub available_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppointmentResponse {
    pub appointment_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub status: AppointmentStatus,
    pub consultation_type: ConsultationType,
    pub reason_for_visit: String,
    pub notes: String,
    pub diagnosis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            appointment_id: appointment.id.to_string(),
            patient_id: appointment.patient_id.to_string(),
            patient_name: appointment.patient_name,
            doctor_id: appointment.doctor_id.to_string(),
            doctor_name: appointment.doctor_name,
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            status: appointment.status,
            consultation_type: appointment.consultation_type,
            reason_for_visit: appointment.reason_for_visit,
            notes: appointment.notes,
            diagnosis: appointment.diagnosis,
            cancelled_at: appointment.cancelled_at.map(format_timestamp),
            cancellation_reason: appointment.cancellation_reason,
            created_at: format_timestamp(appointment.created_at),
            updated_at: format_timestamp(appointment.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> BookAppointmentRequest {
        BookAppointmentRequest {
            patient_id: "p".into(),
            doctor_id: "d".into(),
            appointment_date: "2025-03-01".into(),
            appointment_time: "10:00".into(),
            ..Default::default()
        }
    }

    #[test]
    fn booking_checks_ids_then_schedule() {
        let req = BookAppointmentRequest {
            doctor_id: String::new(),
            appointment_time: String::new(),
            ..booking()
        };
        assert_eq!(req.validate().unwrap_err().to_string(), "patient_id and doctor_id are required");

        let req = BookAppointmentRequest {
            appointment_time: String::new(),
            ..booking()
        };
        assert_eq!(
            req.validate().unwrap_err().to_string(),
            "appointment_date and appointment_time are required"
        );
    }

    #[test]
    fn booking_rejects_malformed_time() {
        let req = BookAppointmentRequest {
            appointment_time: "10am".into(),
            ..booking()
        };
        assert_eq!(
            req.validate().unwrap_err().to_string(),
            "appointment_time must be a time in HH:MM format"
        );
    }

    #[test]
    fn reschedule_requires_new_slot() {
        let req = RescheduleAppointmentRequest {
            new_appointment_date: "2025-03-02".into(),
            ..Default::default()
        };
        assert_eq!(
            req.validate().unwrap_err().to_string(),
            "new_appointment_date and new_appointment_time are required"
        );
    }
}
