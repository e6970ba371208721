use database_layer::{Address, BloodGroup, Gender, MedicalRecord, Patient, VitalSigns};
use error_common::{ClinicError, Result};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::utils::timestamps::{format_date, format_timestamp, parse_date};
use crate::validation::RequestValidation;
use crate::{validate_field, validate_required};

/// Register patient request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterPatientRequest {
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Roe")]
    pub last_name: String,
    #[schema(example = "jane.roe@example.com")]
    pub email: String,
    #[schema(example = "555-010-2030")]
    pub phone_number: String,
    /// `YYYY-MM-DD`, may be left empty
    #[schema(example = "1988-04-12")]
    pub date_of_birth: String,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub address: Option<Address>,
}

impl RequestValidation for RegisterPatientRequest {
    fn validate(&self) -> Result<()> {
        validate_required!("first_name and last_name are required", self.first_name, self.last_name);
        validate_required!("email and phone_number are required", self.email, self.phone_number);
        validate_date_of_birth(&self.date_of_birth)
    }
}

/// Update patient request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<Gender>,
    pub blood_group: Option<BloodGroup>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
}

impl RequestValidation for UpdatePatientRequest {
    fn validate(&self) -> Result<()> {
        for (value, message) in [
            (&self.first_name, "first_name must not be empty"),
            (&self.last_name, "last_name must not be empty"),
            (&self.email, "email must not be empty"),
            (&self.phone_number, "phone_number must not be empty"),
        ] {
            if let Some(v) = value {
                validate_field!(!v.trim().is_empty(), ClinicError::validation(message));
            }
        }
        match &self.date_of_birth {
            Some(dob) => validate_date_of_birth(dob),
            None => Ok(()),
        }
    }
}

fn validate_date_of_birth(value: &str) -> Result<()> {
    if !value.is_empty() {
        parse_date("date_of_birth", value)?;
    }
    Ok(())
}

/// Patient search filters, all optional and combined with AND
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct SearchPatientsQuery {
    /// Case-insensitive substring of first or last name
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub patient_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientResponse {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub address: Option<Address>,
    #[schema(example = "2025-03-01T09:00:00Z")]
    pub created_at: String,
    pub updated_at: String,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self {
            patient_id: patient.id.to_string(),
            first_name: patient.first_name,
            last_name: patient.last_name,
            email: patient.email,
            phone_number: patient.phone_number,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            blood_group: patient.blood_group,
            address: patient.address,
            created_at: format_timestamp(patient.created_at),
            updated_at: format_timestamp(patient.updated_at),
        }
    }
}

/// New visit record for a patient
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct AddMedicalRecordRequest {
    pub doctor_id: String,
    /// `YYYY-MM-DD`; today when absent
    pub visit_date: Option<String>,
    pub diagnosis: String,
    pub symptoms: String,
    pub treatment: String,
    pub prescriptions: String,
    pub lab_results: String,
    pub vital_signs: Option<VitalSigns>,
    pub notes: String,
    pub follow_up_date: Option<String>,
    #[schema(example = "consultation")]
    pub record_type: String,
}

impl RequestValidation for AddMedicalRecordRequest {
    fn validate(&self) -> Result<()> {
        validate_required!("doctor_id is required", self.doctor_id);
        Ok(())
    }
}

/// One entry of a patient's medical history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MedicalRecordSummary {
    pub record_id: String,
    pub doctor_id: String,
    #[schema(example = "2025-03-01")]
    pub visit_date: String,
    pub diagnosis: String,
    pub notes: String,
}

impl From<MedicalRecord> for MedicalRecordSummary {
    fn from(record: MedicalRecord) -> Self {
        Self {
            record_id: record.id.to_string(),
            doctor_id: record.doctor_id.to_string(),
            visit_date: format_date(record.visit_date),
            diagnosis: record.diagnosis,
            notes: record.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MedicalHistoryResponse {
    pub patient_id: String,
    pub records: Vec<MedicalRecordSummary>,
}
