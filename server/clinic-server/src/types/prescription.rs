use database_layer::{Medication, Prescription};
use error_common::{ClinicError, Result};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::timestamps::{format_date, format_timestamp};
use crate::validation::{parse_optional_id, RequestValidation};
use crate::{validate_field, validate_required};

/// Default validity when the caller gives none
pub const DEFAULT_VALIDITY_DAYS: i64 = 30;

/// Longest validity accepted, one hundred years
pub const MAX_VALIDITY_DAYS: i32 = 36_500;

/// Create prescription request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreatePrescriptionRequest {
    /// Appointment the prescription was written in, if any
    pub appointment_id: Option<String>,
    pub patient_id: String,
    pub doctor_id: String,
    pub medications: Vec<Medication>,
    pub diagnosis: String,
    pub additional_instructions: String,
    /// Values <= 0 mean 30 days
    #[schema(example = 30)]
    pub validity_days: i32,
}

impl CreatePrescriptionRequest {
    pub fn effective_validity_days(&self) -> i64 {
        if self.validity_days <= 0 {
            DEFAULT_VALIDITY_DAYS
        } else {
            i64::from(self.validity_days)
        }
    }
}

impl RequestValidation for CreatePrescriptionRequest {
    fn validate(&self) -> Result<()> {
        validate_required!("patient_id and doctor_id are required", self.patient_id, self.doctor_id);
        validate_field!(
            !self.medications.is_empty(),
            ClinicError::missing_field("at least one medication is required")
        );
        validate_field!(
            self.validity_days <= MAX_VALIDITY_DAYS,
            ClinicError::validation("validity_days is out of range")
        );
        parse_optional_id("appointment_id", self.appointment_id.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionResponse {
    pub prescription_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub medications: Vec<Medication>,
    pub diagnosis: String,
    pub additional_instructions: String,
    #[schema(example = "2025-03-01")]
    pub prescription_date: String,
    #[schema(example = "2025-03-31")]
    pub valid_until: String,
    /// False once `valid_until` has passed
    pub is_active: bool,
    pub created_at: String,
}

impl From<Prescription> for PrescriptionResponse {
    fn from(prescription: Prescription) -> Self {
        Self {
            prescription_id: prescription.id.to_string(),
            appointment_id: prescription.appointment_id.map(|id| id.to_string()),
            patient_id: prescription.patient_id.to_string(),
            patient_name: prescription.patient_name,
            doctor_id: prescription.doctor_id.to_string(),
            doctor_name: prescription.doctor_name,
            medications: prescription.medications,
            diagnosis: prescription.diagnosis,
            additional_instructions: prescription.additional_instructions,
            prescription_date: format_date(prescription.prescription_date),
            valid_until: format_date(prescription.valid_until),
            is_active: prescription.is_active,
            created_at: format_timestamp(prescription.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreatePrescriptionRequest {
        CreatePrescriptionRequest {
            patient_id: "p".into(),
            doctor_id: "d".into(),
            medications: vec![Medication {
                medication_name: "Amoxicillin".into(),
                dosage: "500mg".into(),
                quantity: 21,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn non_positive_validity_defaults_to_thirty_days() {
        assert_eq!(request().effective_validity_days(), 30);
        let req = CreatePrescriptionRequest {
            validity_days: -5,
            ..request()
        };
        assert_eq!(req.effective_validity_days(), 30);
        let req = CreatePrescriptionRequest {
            validity_days: 7,
            ..request()
        };
        assert_eq!(req.effective_validity_days(), 7);
    }

    #[test]
    fn medications_are_required() {
        let req = CreatePrescriptionRequest {
            medications: Vec::new(),
            ..request()
        };
        assert_eq!(req.validate().unwrap_err().to_string(), "at least one medication is required");
    }

    #[test]
    fn appointment_reference_must_be_a_uuid() {
        let req = CreatePrescriptionRequest {
            appointment_id: Some("apt-1".into()),
            ..request()
        };
        assert_eq!(req.validate().unwrap_err().to_string(), "appointment_id must be a valid UUID");
    }
}
