use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use database_layer::{
    repository::{DoctorRepository, PatientRepository, PrescriptionRepository},
    Prescription,
};
use error_common::{ClinicError, Result, StorageContext};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{require_doctor, require_patient, Repositories};
use crate::types::{CreatePrescriptionRequest, DateRangeQuery, PrescriptionResponse};
use crate::validation::{parse_id, parse_optional_id, RequestValidation};

/// Prescriptions and their validity window
///
/// Activity is derived on every read: a prescription whose `valid_until`
/// has passed comes back with `is_active = false`, while the stored row
/// keeps whatever flag it was written with.
#[derive(Clone)]
pub struct PrescriptionService {
    prescriptions: Arc<dyn PrescriptionRepository>,
    patients: Arc<dyn PatientRepository>,
    doctors: Arc<dyn DoctorRepository>,
}

impl PrescriptionService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            prescriptions: Arc::clone(&repos.prescriptions),
            patients: Arc::clone(&repos.patients),
            doctors: Arc::clone(&repos.doctors),
        }
    }

    fn present(prescription: Prescription, now: DateTime<Utc>) -> PrescriptionResponse {
        prescription.with_derived_activity(now).into()
    }

    /// # Errors
    ///
    /// Missing ids or medications, `"patient not found"`,
    /// `"doctor not found"` or a storage failure.
    #[instrument(name = "PrescriptionService.CreatePrescription", skip_all)]
    pub async fn create_prescription(&self, req: CreatePrescriptionRequest) -> Result<PrescriptionResponse> {
        req.validate()?;
        let patient_id = parse_id("patient_id", &req.patient_id)?;
        let doctor_id = parse_id("doctor_id", &req.doctor_id)?;
        let appointment_id = parse_optional_id("appointment_id", req.appointment_id.as_deref())?;

        let patient = require_patient(self.patients.as_ref(), patient_id).await?;
        let doctor = require_doctor(self.doctors.as_ref(), doctor_id).await?;

        let now = Utc::now();
        let valid_until = Duration::try_days(req.effective_validity_days())
            .and_then(|validity| now.checked_add_signed(validity))
            .ok_or_else(|| ClinicError::validation("validity_days is out of range"))?;
        let prescription = Prescription {
            id: Uuid::new_v4(),
            appointment_id,
            patient_id,
            patient_name: patient.full_name(),
            doctor_id,
            doctor_name: doctor.full_name(),
            medications: req.medications,
            diagnosis: req.diagnosis,
            additional_instructions: req.additional_instructions,
            prescription_date: now,
            valid_until,
            is_active: true,
            created_at: now,
        };

        self.prescriptions
            .create(&prescription)
            .await
            .storage_context("failed to create prescription")?;

        info!(
            prescription_id = %prescription.id,
            medications = prescription.medications.len(),
            "Prescription created"
        );
        Ok(Self::present(prescription, now))
    }

    /// # Errors
    ///
    /// `"prescription not found"`, an id error or a storage failure.
    #[instrument(name = "PrescriptionService.GetPrescription", skip(self))]
    pub async fn get_prescription(&self, prescription_id: &str) -> Result<PrescriptionResponse> {
        let id = parse_id("prescription_id", prescription_id)?;
        let prescription = self
            .prescriptions
            .get(id)
            .await
            .storage_context("failed to get prescription")?
            .ok_or(ClinicError::not_found("prescription"))?;

        Ok(Self::present(prescription, Utc::now()))
    }

    /// # Errors
    ///
    /// An id or date error, or a storage failure.
    #[instrument(name = "PrescriptionService.GetPatientPrescriptions", skip(self, query))]
    pub async fn get_patient_prescriptions(
        &self,
        patient_id: &str,
        query: DateRangeQuery,
    ) -> Result<Vec<PrescriptionResponse>> {
        let id = parse_id("patient_id", patient_id)?;
        let range = query.to_range()?;
        let rows = self
            .prescriptions
            .list_by_patient(id, &range)
            .await
            .storage_context("failed to get patient prescriptions")?;

        let now = Utc::now();
        Ok(rows.into_iter().map(|p| Self::present(p, now)).collect())
    }

    /// # Errors
    ///
    /// An id or date error, or a storage failure.
    #[instrument(name = "PrescriptionService.GetDoctorPrescriptions", skip(self, query))]
    pub async fn get_doctor_prescriptions(
        &self,
        doctor_id: &str,
        query: DateRangeQuery,
    ) -> Result<Vec<PrescriptionResponse>> {
        let id = parse_id("doctor_id", doctor_id)?;
        let range = query.to_range()?;
        let rows = self
            .prescriptions
            .list_by_doctor(id, &range)
            .await
            .storage_context("failed to get doctor prescriptions")?;

        let now = Utc::now();
        Ok(rows.into_iter().map(|p| Self::present(p, now)).collect())
    }

    /// Prescription written during an appointment.
    ///
    /// # Errors
    ///
    /// `"prescription not found"` when the appointment has none.
    #[instrument(name = "PrescriptionService.GetAppointmentPrescription", skip(self))]
    pub async fn get_appointment_prescription(&self, appointment_id: &str) -> Result<PrescriptionResponse> {
        let id = parse_id("appointment_id", appointment_id)?;
        let prescription = self
            .prescriptions
            .get_by_appointment(id)
            .await
            .storage_context("failed to get appointment prescription")?
            .ok_or(ClinicError::not_found("prescription"))?;

        Ok(Self::present(prescription, Utc::now()))
    }
}
