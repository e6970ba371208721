use database_layer::{Doctor, DoctorAvailability, Specialization};
use error_common::{ClinicError, Result};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::utils::timestamps::{format_timestamp, parse_time};
use crate::validation::RequestValidation;
use crate::{validate_field, validate_required};

/// Register doctor request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterDoctorRequest {
    #[schema(example = "Gregory")]
    pub first_name: String,
    #[schema(example = "House")]
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub specialization: Specialization,
    #[schema(example = "MD-40213")]
    pub license_number: String,
    pub years_of_experience: i32,
    pub qualifications: Vec<String>,
    pub languages: Vec<String>,
    /// Fee in the smallest currency unit
    pub consultation_fee: i32,
}

impl RequestValidation for RegisterDoctorRequest {
    fn validate(&self) -> Result<()> {
        validate_required!("first_name and last_name are required", self.first_name, self.last_name);
        validate_required!("email and phone_number are required", self.email, self.phone_number);
        validate_required!("license_number is required", self.license_number);
        validate_field!(
            self.years_of_experience >= 0,
            ClinicError::validation("years_of_experience must not be negative")
        );
        validate_field!(
            self.consultation_fee >= 0,
            ClinicError::validation("consultation_fee must not be negative")
        );
        Ok(())
    }
}

/// Update doctor request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateDoctorRequest {
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub consultation_fee: Option<i32>,
    pub is_available: Option<bool>,
}

impl RequestValidation for UpdateDoctorRequest {
    fn validate(&self) -> Result<()> {
        if let Some(phone) = &self.phone_number {
            validate_field!(!phone.trim().is_empty(), ClinicError::validation("phone_number must not be empty"));
        }
        if let Some(email) = &self.email {
            validate_field!(!email.trim().is_empty(), ClinicError::validation("email must not be empty"));
        }
        if let Some(fee) = self.consultation_fee {
            validate_field!(fee >= 0, ClinicError::validation("consultation_fee must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct SearchDoctorsQuery {
    /// Case-insensitive substring of first or last name
    pub name: Option<String>,
    /// `UNSPECIFIED` behaves like no filter
    pub specialization: Option<Specialization>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorResponse {
    pub doctor_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub specialization: Specialization,
    pub license_number: String,
    pub years_of_experience: i32,
    pub qualifications: Vec<String>,
    pub languages: Vec<String>,
    pub consultation_fee: i32,
    pub is_available: bool,
    pub average_rating: f32,
    pub total_consultations: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            doctor_id: doctor.id.to_string(),
            first_name: doctor.first_name,
            last_name: doctor.last_name,
            email: doctor.email,
            phone_number: doctor.phone_number,
            specialization: doctor.specialization,
            license_number: doctor.license_number,
            years_of_experience: doctor.years_of_experience,
            qualifications: doctor.qualifications,
            languages: doctor.languages,
            consultation_fee: doctor.consultation_fee,
            is_available: doctor.is_available,
            average_rating: doctor.average_rating,
            total_consultations: doctor.total_consultations,
            created_at: format_timestamp(doctor.created_at),
            updated_at: format_timestamp(doctor.updated_at),
        }
    }
}

/// Weekly availability window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AvailabilitySlot {
    #[schema(example = "MONDAY")]
    pub day_of_week: String,
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "13:00")]
    pub end_time: String,
    /// Values <= 0 are stored as 30
    pub slot_duration_minutes: i32,
}

impl From<DoctorAvailability> for AvailabilitySlot {
    fn from(row: DoctorAvailability) -> Self {
        Self {
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            slot_duration_minutes: row.slot_duration_minutes,
        }
    }
}

/// Replaces the doctor's whole availability set
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SetAvailabilityRequest {
    pub availability_slots: Vec<AvailabilitySlot>,
}

impl RequestValidation for SetAvailabilityRequest {
    fn validate(&self) -> Result<()> {
        for slot in &self.availability_slots {
            validate_required!("day_of_week is required", slot.day_of_week);
            let start = parse_time("start_time", &slot.start_time)?;
            let end = parse_time("end_time", &slot.end_time)?;
            validate_field!(start < end, ClinicError::validation("start_time must be before end_time"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorAvailabilityResponse {
    pub doctor_id: String,
    pub availability_slots: Vec<AvailabilitySlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterDoctorRequest {
        RegisterDoctorRequest {
            first_name: "Gregory".into(),
            last_name: "House".into(),
            email: "house@example.com".into(),
            phone_number: "555-000-1111".into(),
            license_number: "MD-1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn license_is_required() {
        let req = RegisterDoctorRequest {
            license_number: String::new(),
            ..registration()
        };
        assert_eq!(req.validate().unwrap_err().to_string(), "license_number is required");
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn availability_windows_must_be_ordered() {
        let req = SetAvailabilityRequest {
            availability_slots: vec![AvailabilitySlot {
                day_of_week: "MONDAY".into(),
                start_time: "13:00".into(),
                end_time: "09:00".into(),
                slot_duration_minutes: 30,
            }],
        };
        assert_eq!(req.validate().unwrap_err().to_string(), "start_time must be before end_time");
    }

    #[test]
    fn empty_availability_set_is_allowed() {
        assert!(SetAvailabilityRequest::default().validate().is_ok());
    }
}
