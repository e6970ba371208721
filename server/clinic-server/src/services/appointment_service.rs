use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use database_layer::{
    repository::{AppointmentFilter, AppointmentRepository, DoctorRepository, PatientRepository},
    Appointment, AppointmentStatus,
};
use error_common::{ClinicError, Result, StorageContext};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::scheduling::{check_transition, day_slots, next_status, AppointmentAction};
use super::{require_doctor, require_patient, write_failure, Repositories};
use crate::types::{
    non_blank, AppointmentResponse, AvailableSlotsResponse, BookAppointmentRequest, CancelAppointmentRequest,
    CompleteAppointmentRequest, DoctorAppointmentsQuery, PatientAppointmentsQuery, RescheduleAppointmentRequest,
    TimeSlot,
};
use crate::utils::timestamps::{format_time, parse_date};
use crate::validation::{parse_id, RequestValidation};

/// Booking, status changes and the daily slot view
#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    patients: Arc<dyn PatientRepository>,
    doctors: Arc<dyn DoctorRepository>,
}

impl AppointmentService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            appointments: Arc::clone(&repos.appointments),
            patients: Arc::clone(&repos.patients),
            doctors: Arc::clone(&repos.doctors),
        }
    }

    async fn load(&self, id: Uuid) -> Result<Appointment> {
        self.appointments
            .get(id)
            .await
            .storage_context("failed to get appointment")?
            .ok_or(ClinicError::not_found("appointment"))
    }

    async fn save(&self, appointment: &Appointment, context: &str) -> Result<()> {
        self.appointments
            .update(appointment)
            .await
            .map_err(|e| write_failure(e, context))
    }

    /// Books a slot for an existing patient with an available doctor.
    ///
    /// # Errors
    ///
    /// In order: missing ids, missing date or time, `"patient not found"`,
    /// `"doctor not found"`, `"doctor is not available"`,
    /// `"time slot is already booked"`.
    #[instrument(name = "AppointmentService.BookAppointment", skip_all)]
    pub async fn book_appointment(&self, req: BookAppointmentRequest) -> Result<AppointmentResponse> {
        req.validate()?;
        let patient_id = parse_id("patient_id", &req.patient_id)?;
        let doctor_id = parse_id("doctor_id", &req.doctor_id)?;

        let patient = require_patient(self.patients.as_ref(), patient_id).await?;
        let doctor = require_doctor(self.doctors.as_ref(), doctor_id).await?;
        if !doctor.is_available {
            return Err(ClinicError::conflict("doctor is not available"));
        }

        let conflict = self
            .appointments
            .check_conflict(doctor_id, &req.appointment_date, &req.appointment_time, None)
            .await
            .storage_context("failed to check appointment conflict")?;
        if conflict.is_some() {
            warn!(
                doctor_id = %doctor_id,
                date = %req.appointment_date,
                time = %req.appointment_time,
                "Time slot already booked"
            );
            return Err(ClinicError::conflict("time slot is already booked"));
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id,
            patient_name: patient.full_name(),
            doctor_id,
            doctor_name: doctor.full_name(),
            appointment_date: req.appointment_date,
            appointment_time: req.appointment_time,
            status: AppointmentStatus::Scheduled,
            consultation_type: req.consultation_type,
            reason_for_visit: req.reason_for_visit,
            notes: req.notes,
            diagnosis: String::new(),
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };

        self.appointments
            .create(&appointment)
            .await
            .map_err(|e| write_failure(e, "failed to create appointment"))?;

        info!(appointment_id = %appointment.id, doctor_id = %doctor_id, "Appointment booked");
        Ok(appointment.into())
    }

    /// # Errors
    ///
    /// `"appointment not found"`, an id error or a storage failure.
    #[instrument(name = "AppointmentService.GetAppointment", skip(self))]
    pub async fn get_appointment(&self, appointment_id: &str) -> Result<AppointmentResponse> {
        let id = parse_id("appointment_id", appointment_id)?;
        Ok(self.load(id).await?.into())
    }

    /// # Errors
    ///
    /// `"appointment is already cancelled"` or
    /// `"cannot cancel a completed appointment"`.
    #[instrument(name = "AppointmentService.CancelAppointment", skip(self, req))]
    pub async fn cancel_appointment(
        &self,
        appointment_id: &str,
        req: CancelAppointmentRequest,
    ) -> Result<AppointmentResponse> {
        let id = parse_id("appointment_id", appointment_id)?;
        let mut appointment = self.load(id).await?;
        check_transition(appointment.status, AppointmentAction::Cancel)?;

        let now = Utc::now();
        appointment.status = next_status(AppointmentAction::Cancel);
        appointment.cancelled_at = Some(now);
        appointment.cancellation_reason = non_blank(Some(req.reason.as_str()));
        appointment.updated_at = now;

        self.save(&appointment, "failed to cancel appointment").await?;

        info!(appointment_id = %appointment.id, "Appointment cancelled");
        Ok(appointment.into())
    }

    /// Moves the appointment to a new slot of the same doctor.
    ///
    /// # Errors
    ///
    /// Terminal status errors or `"new time slot is already booked"`.
    #[instrument(name = "AppointmentService.RescheduleAppointment", skip(self, req))]
    pub async fn reschedule_appointment(
        &self,
        appointment_id: &str,
        req: RescheduleAppointmentRequest,
    ) -> Result<AppointmentResponse> {
        let id = parse_id("appointment_id", appointment_id)?;
        req.validate()?;
        let mut appointment = self.load(id).await?;
        check_transition(appointment.status, AppointmentAction::Reschedule)?;

        let conflict = self
            .appointments
            .check_conflict(
                appointment.doctor_id,
                &req.new_appointment_date,
                &req.new_appointment_time,
                Some(appointment.id),
            )
            .await
            .storage_context("failed to check appointment conflict")?;
        if conflict.is_some() {
            return Err(ClinicError::conflict("new time slot is already booked"));
        }

        appointment.appointment_date = req.new_appointment_date;
        appointment.appointment_time = req.new_appointment_time;
        appointment.status = next_status(AppointmentAction::Reschedule);
        if !req.reason.is_empty() {
            appointment.notes.push_str("\nRescheduled: ");
            appointment.notes.push_str(&req.reason);
        }
        appointment.updated_at = Utc::now();

        self.save(&appointment, "failed to reschedule appointment")
            .await
            .map_err(|e| match e {
                ClinicError::Conflict(_) => ClinicError::conflict("new time slot is already booked"),
                other => other,
            })?;

        info!(appointment_id = %appointment.id, "Appointment rescheduled");
        Ok(appointment.into())
    }

    /// Closes the appointment and bumps the doctor's consultation count.
    ///
    /// The counter update is best-effort and never fails the call.
    ///
    /// # Errors
    ///
    /// `"cannot complete a cancelled appointment"` or
    /// `"appointment is already completed"`.
    #[instrument(name = "AppointmentService.CompleteAppointment", skip(self, req))]
    pub async fn complete_appointment(
        &self,
        appointment_id: &str,
        req: CompleteAppointmentRequest,
    ) -> Result<AppointmentResponse> {
        let id = parse_id("appointment_id", appointment_id)?;
        let mut appointment = self.load(id).await?;
        check_transition(appointment.status, AppointmentAction::Complete)?;

        appointment.status = next_status(AppointmentAction::Complete);
        appointment.diagnosis = req.diagnosis;
        if !req.notes.is_empty() {
            appointment.notes = req.notes;
        }
        appointment.updated_at = Utc::now();

        self.save(&appointment, "failed to complete appointment").await?;

        if let Err(e) = self.doctors.increment_consultations(appointment.doctor_id).await {
            warn!(
                doctor_id = %appointment.doctor_id,
                error = %e,
                "Failed to update doctor consultation count"
            );
        }

        info!(appointment_id = %appointment.id, "Appointment completed");
        Ok(appointment.into())
    }

    /// The fixed daily grid for one doctor, with booked start times marked.
    ///
    /// # Errors
    ///
    /// `"doctor_id and date are required"`, `"doctor not found"` or a
    /// malformed date.
    #[instrument(name = "AppointmentService.GetAvailableSlots", skip(self))]
    pub async fn get_available_slots(&self, doctor_id: &str, date: &str) -> Result<AvailableSlotsResponse> {
        if doctor_id.trim().is_empty() || date.trim().is_empty() {
            return Err(ClinicError::missing_field("doctor_id and date are required"));
        }
        let id = parse_id("doctor_id", doctor_id)?;
        parse_date("date", date)?;
        let doctor = require_doctor(self.doctors.as_ref(), id).await?;

        let booked: HashSet<String> = self
            .appointments
            .list_by_doctor_and_date(id, date)
            .await
            .storage_context("failed to get existing appointments")?
            .into_iter()
            .map(|a| a.appointment_time)
            .collect();

        let available_slots = day_slots()
            .into_iter()
            .map(|window| {
                let start_time = format_time(window.start);
                TimeSlot {
                    is_available: !booked.contains(&start_time),
                    end_time: format_time(window.end),
                    start_time,
                }
            })
            .collect();

        Ok(AvailableSlotsResponse {
            doctor_id: id.to_string(),
            doctor_name: doctor.full_name(),
            date: date.to_string(),
            available_slots,
        })
    }

    /// # Errors
    ///
    /// An id or date error, or a storage failure.
    #[instrument(name = "AppointmentService.GetPatientAppointments", skip(self, query))]
    pub async fn get_patient_appointments(
        &self,
        patient_id: &str,
        query: PatientAppointmentsQuery,
    ) -> Result<Vec<AppointmentResponse>> {
        let id = parse_id("patient_id", patient_id)?;
        let filter = AppointmentFilter {
            status: query.status,
            from_date: checked_date("from_date", query.from_date.as_deref())?,
            to_date: checked_date("to_date", query.to_date.as_deref())?,
            date: None,
        };

        let appointments = self
            .appointments
            .list_by_patient(id, &filter)
            .await
            .storage_context("failed to get patient appointments")?;

        Ok(appointments.into_iter().map(AppointmentResponse::from).collect())
    }

    /// # Errors
    ///
    /// An id or date error, or a storage failure.
    #[instrument(name = "AppointmentService.GetDoctorAppointments", skip(self, query))]
    pub async fn get_doctor_appointments(
        &self,
        doctor_id: &str,
        query: DoctorAppointmentsQuery,
    ) -> Result<Vec<AppointmentResponse>> {
        let id = parse_id("doctor_id", doctor_id)?;
        let filter = AppointmentFilter {
            status: query.status,
            date: checked_date("date", query.date.as_deref())?,
            ..AppointmentFilter::default()
        };

        let appointments = self
            .appointments
            .list_by_doctor(id, &filter)
            .await
            .storage_context("failed to get doctor appointments")?;

        Ok(appointments.into_iter().map(AppointmentResponse::from).collect())
    }
}

/// Appointment dates are compared as text, so a filter must have the same shape.
fn checked_date(field: &str, value: Option<&str>) -> Result<Option<String>> {
    match non_blank(value) {
        Some(date) => {
            parse_date(field, &date)?;
            Ok(Some(date))
        }
        None => Ok(None),
    }
}
