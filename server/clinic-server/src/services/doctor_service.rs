use std::sync::Arc;

use chrono::Utc;
use database_layer::{
    repository::{DoctorRepository, DoctorSearch},
    Doctor, DoctorAvailability, Specialization,
};
use error_common::{ClinicError, Result, StorageContext};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{require_doctor, write_failure, Repositories};
use crate::types::{
    non_blank, AvailabilitySlot, DoctorAvailabilityResponse, DoctorResponse, RegisterDoctorRequest,
    SearchDoctorsQuery, SetAvailabilityRequest, UpdateDoctorRequest,
};
use crate::validation::{parse_id, RequestValidation};

/// Slot length stored when the caller gives none
pub const DEFAULT_SLOT_MINUTES: i32 = 30;

/// Doctor registration, profile updates and weekly availability
#[derive(Clone)]
pub struct DoctorService {
    doctors: Arc<dyn DoctorRepository>,
}

impl DoctorService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            doctors: Arc::clone(&repos.doctors),
        }
    }

    /// Registers a doctor. Email, phone number and license must be unused.
    ///
    /// # Errors
    ///
    /// Validation errors, one of the `"... already registered"` conflicts,
    /// or a storage failure.
    #[instrument(name = "DoctorService.RegisterDoctor", skip_all)]
    pub async fn register_doctor(&self, req: RegisterDoctorRequest) -> Result<DoctorResponse> {
        req.validate()?;

        if self
            .doctors
            .get_by_email(&req.email)
            .await
            .storage_context("failed to check existing email")?
            .is_some()
        {
            return Err(ClinicError::already_exists("email already registered"));
        }
        if self
            .doctors
            .get_by_phone(&req.phone_number)
            .await
            .storage_context("failed to check existing phone")?
            .is_some()
        {
            return Err(ClinicError::already_exists("phone number already registered"));
        }
        if self
            .doctors
            .get_by_license(&req.license_number)
            .await
            .storage_context("failed to check existing license")?
            .is_some()
        {
            return Err(ClinicError::already_exists("license number already registered"));
        }

        let now = Utc::now();
        let doctor = Doctor {
            id: Uuid::new_v4(),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            specialization: req.specialization,
            license_number: req.license_number,
            years_of_experience: req.years_of_experience,
            qualifications: req.qualifications,
            languages: req.languages,
            consultation_fee: req.consultation_fee,
            is_available: true,
            average_rating: 0.0,
            total_consultations: 0,
            created_at: now,
            updated_at: now,
        };

        self.doctors
            .create(&doctor)
            .await
            .map_err(|e| write_failure(e, "failed to create doctor"))?;

        info!(doctor_id = %doctor.id, "Doctor registered");
        Ok(doctor.into())
    }

    /// # Errors
    ///
    /// `"doctor not found"`, an id error or a storage failure.
    #[instrument(name = "DoctorService.GetDoctor", skip(self))]
    pub async fn get_doctor(&self, doctor_id: &str) -> Result<DoctorResponse> {
        let id = parse_id("doctor_id", doctor_id)?;
        Ok(require_doctor(self.doctors.as_ref(), id).await?.into())
    }

    /// # Errors
    ///
    /// `"doctor not found"`, uniqueness errors or a storage failure.
    #[instrument(name = "DoctorService.UpdateDoctor", skip(self, req))]
    pub async fn update_doctor(&self, doctor_id: &str, req: UpdateDoctorRequest) -> Result<DoctorResponse> {
        let id = parse_id("doctor_id", doctor_id)?;
        req.validate()?;
        let mut doctor = require_doctor(self.doctors.as_ref(), id).await?;

        if let Some(phone_number) = req.phone_number {
            doctor.phone_number = phone_number;
        }
        if let Some(email) = req.email {
            doctor.email = email;
        }
        if let Some(fee) = req.consultation_fee {
            doctor.consultation_fee = fee;
        }
        if let Some(is_available) = req.is_available {
            doctor.is_available = is_available;
        }
        doctor.updated_at = Utc::now();

        self.doctors
            .update(&doctor)
            .await
            .map_err(|e| write_failure(e, "failed to update doctor"))?;

        Ok(doctor.into())
    }

    /// # Errors
    ///
    /// Storage failure only.
    #[instrument(name = "DoctorService.SearchDoctors", skip_all)]
    pub async fn search_doctors(&self, query: SearchDoctorsQuery) -> Result<Vec<DoctorResponse>> {
        let filter = DoctorSearch {
            name: non_blank(query.name.as_deref()),
            specialization: query.specialization.filter(|s| *s != Specialization::Unspecified),
            is_available: query.is_available,
        };

        let doctors = self
            .doctors
            .search(&filter)
            .await
            .storage_context("failed to search doctors")?;

        Ok(doctors.into_iter().map(DoctorResponse::from).collect())
    }

    /// Replaces the doctor's availability with `req.availability_slots`.
    ///
    /// # Errors
    ///
    /// `"doctor not found"`, malformed windows or a storage failure.
    #[instrument(name = "DoctorService.SetAvailability", skip(self, req))]
    pub async fn set_availability(
        &self,
        doctor_id: &str,
        req: SetAvailabilityRequest,
    ) -> Result<DoctorAvailabilityResponse> {
        let id = parse_id("doctor_id", doctor_id)?;
        req.validate()?;
        require_doctor(self.doctors.as_ref(), id).await?;

        let rows: Vec<DoctorAvailability> = req
            .availability_slots
            .into_iter()
            .map(|slot| DoctorAvailability {
                id: Uuid::new_v4(),
                doctor_id: id,
                day_of_week: slot.day_of_week,
                start_time: slot.start_time,
                end_time: slot.end_time,
                slot_duration_minutes: if slot.slot_duration_minutes <= 0 {
                    DEFAULT_SLOT_MINUTES
                } else {
                    slot.slot_duration_minutes
                },
            })
            .collect();

        self.doctors
            .set_availability(id, &rows)
            .await
            .storage_context("failed to set availability")?;

        info!(doctor_id = %id, windows = rows.len(), "Doctor availability replaced");
        Ok(DoctorAvailabilityResponse {
            doctor_id: id.to_string(),
            availability_slots: rows.into_iter().map(AvailabilitySlot::from).collect(),
        })
    }

    /// # Errors
    ///
    /// `"doctor not found"` or a storage failure.
    #[instrument(name = "DoctorService.GetDoctorAvailability", skip(self))]
    pub async fn get_availability(&self, doctor_id: &str) -> Result<DoctorAvailabilityResponse> {
        let id = parse_id("doctor_id", doctor_id)?;
        require_doctor(self.doctors.as_ref(), id).await?;

        let rows = self
            .doctors
            .get_availability(id)
            .await
            .storage_context("failed to get availability")?;

        Ok(DoctorAvailabilityResponse {
            doctor_id: id.to_string(),
            availability_slots: rows.into_iter().map(AvailabilitySlot::from).collect(),
        })
    }
}
