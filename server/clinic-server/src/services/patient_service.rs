use std::sync::Arc;

use chrono::Utc;
use database_layer::{
    repository::{DoctorRepository, MedicalRecordRepository, PatientRepository, PatientSearch},
    MedicalRecord, Patient,
};
use error_common::{ClinicError, Result, StorageContext};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{require_doctor, require_patient, write_failure, Repositories};
use crate::types::{
    non_blank, AddMedicalRecordRequest, DateRangeQuery, MedicalHistoryResponse, MedicalRecordSummary,
    PatientResponse, RegisterPatientRequest, SearchPatientsQuery, UpdatePatientRequest,
};
use crate::utils::timestamps::{parse_date_as_timestamp, parse_optional_date};
use crate::validation::{parse_id, parse_optional_id, RequestValidation};

/// Patient registration, lookup and medical history
#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
    doctors: Arc<dyn DoctorRepository>,
    medical_records: Arc<dyn MedicalRecordRepository>,
}

impl PatientService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            patients: Arc::clone(&repos.patients),
            doctors: Arc::clone(&repos.doctors),
            medical_records: Arc::clone(&repos.medical_records),
        }
    }

    /// Registers a patient. Email and phone number must both be unused.
    ///
    /// # Errors
    ///
    /// Validation errors, `"email already registered"`,
    /// `"phone number already registered"` or a storage failure.
    #[instrument(name = "PatientService.RegisterPatient", skip_all)]
    pub async fn register_patient(&self, req: RegisterPatientRequest) -> Result<PatientResponse> {
        req.validate()?;

        if self
            .patients
            .get_by_email(&req.email)
            .await
            .storage_context("failed to check existing email")?
            .is_some()
        {
            return Err(ClinicError::already_exists("email already registered"));
        }
        if self
            .patients
            .get_by_phone(&req.phone_number)
            .await
            .storage_context("failed to check existing phone")?
            .is_some()
        {
            return Err(ClinicError::already_exists("phone number already registered"));
        }

        let now = Utc::now();
        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            date_of_birth: req.date_of_birth,
            gender: req.gender,
            blood_group: req.blood_group,
            address: req.address,
            created_at: now,
            updated_at: now,
        };

        self.patients
            .create(&patient)
            .await
            .map_err(|e| write_failure(e, "failed to create patient"))?;

        info!(patient_id = %patient.id, "Patient registered");
        Ok(patient.into())
    }

    /// # Errors
    ///
    /// `"patient not found"`, an id error or a storage failure.
    #[instrument(name = "PatientService.GetPatient", skip(self))]
    pub async fn get_patient(&self, patient_id: &str) -> Result<PatientResponse> {
        let id = parse_id("patient_id", patient_id)?;
        Ok(require_patient(self.patients.as_ref(), id).await?.into())
    }

    /// Applies the supplied fields only.
    ///
    /// # Errors
    ///
    /// `"patient not found"`, uniqueness errors when the new email or phone
    /// belongs to someone else, or a storage failure.
    #[instrument(name = "PatientService.UpdatePatient", skip(self, req))]
    pub async fn update_patient(&self, patient_id: &str, req: UpdatePatientRequest) -> Result<PatientResponse> {
        let id = parse_id("patient_id", patient_id)?;
        req.validate()?;
        let mut patient = require_patient(self.patients.as_ref(), id).await?;

        if let Some(first_name) = req.first_name {
            patient.first_name = first_name;
        }
        if let Some(last_name) = req.last_name {
            patient.last_name = last_name;
        }
        if let Some(date_of_birth) = req.date_of_birth {
            patient.date_of_birth = date_of_birth;
        }
        if let Some(gender) = req.gender {
            patient.gender = gender;
        }
        if let Some(blood_group) = req.blood_group {
            patient.blood_group = blood_group;
        }
        if let Some(phone_number) = req.phone_number {
            patient.phone_number = phone_number;
        }
        if let Some(email) = req.email {
            patient.email = email;
        }
        if let Some(address) = req.address {
            patient.address = Some(address);
        }
        patient.updated_at = Utc::now();

        self.patients
            .update(&patient)
            .await
            .map_err(|e| write_failure(e, "failed to update patient"))?;

        Ok(patient.into())
    }

    /// # Errors
    ///
    /// A malformed `patient_id` filter or a storage failure.
    #[instrument(name = "PatientService.SearchPatients", skip_all)]
    pub async fn search_patients(&self, query: SearchPatientsQuery) -> Result<Vec<PatientResponse>> {
        let filter = PatientSearch {
            name: non_blank(query.name.as_deref()),
            email: non_blank(query.email.as_deref()),
            phone_number: non_blank(query.phone_number.as_deref()),
            patient_id: parse_optional_id("patient_id", query.patient_id.as_deref())?,
        };

        let patients = self
            .patients
            .search(&filter)
            .await
            .storage_context("failed to search patients")?;

        Ok(patients.into_iter().map(PatientResponse::from).collect())
    }

    /// Visit records of a patient, newest first.
    ///
    /// # Errors
    ///
    /// `"patient not found"`, a malformed date bound or a storage failure.
    #[instrument(name = "PatientService.GetMedicalHistory", skip(self, query))]
    pub async fn get_medical_history(&self, patient_id: &str, query: DateRangeQuery) -> Result<MedicalHistoryResponse> {
        let id = parse_id("patient_id", patient_id)?;
        let range = query.to_range()?;
        require_patient(self.patients.as_ref(), id).await?;

        let records = self
            .medical_records
            .list_by_patient(id, &range)
            .await
            .storage_context("failed to fetch medical records")?;

        Ok(MedicalHistoryResponse {
            patient_id: id.to_string(),
            records: records.into_iter().map(MedicalRecordSummary::from).collect(),
        })
    }

    /// Stores a visit record for an existing patient and doctor.
    ///
    /// # Errors
    ///
    /// `"patient not found"`, `"doctor not found"`, malformed dates or a
    /// storage failure.
    #[instrument(name = "PatientService.AddMedicalRecord", skip(self, req))]
    pub async fn add_medical_record(
        &self,
        patient_id: &str,
        req: AddMedicalRecordRequest,
    ) -> Result<MedicalRecordSummary> {
        let patient_id = parse_id("patient_id", patient_id)?;
        req.validate()?;
        let doctor_id = parse_id("doctor_id", &req.doctor_id)?;

        let now = Utc::now();
        let visit_date = match non_blank(req.visit_date.as_deref()) {
            Some(date) => parse_date_as_timestamp("visit_date", &date)?,
            None => now,
        };
        let follow_up_date = parse_optional_date("follow_up_date", req.follow_up_date.as_deref())?
            .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc());

        require_patient(self.patients.as_ref(), patient_id).await?;
        require_doctor(self.doctors.as_ref(), doctor_id).await?;

        let record = MedicalRecord {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            visit_date,
            diagnosis: req.diagnosis,
            symptoms: req.symptoms,
            treatment: req.treatment,
            prescriptions: req.prescriptions,
            lab_results: req.lab_results,
            vital_signs: req.vital_signs,
            notes: req.notes,
            follow_up_date,
            record_type: req.record_type,
            created_at: now,
            updated_at: now,
        };

        self.medical_records
            .create(&record)
            .await
            .storage_context("failed to create medical record")?;

        info!(record_id = %record.id, patient_id = %patient_id, "Medical record added");
        Ok(record.into())
    }
}
