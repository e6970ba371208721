//! Shared fixtures for the integration tests

#![allow(dead_code)]

use clinic_server::services::Repositories;
use clinic_server::types::{
    BookAppointmentRequest, DoctorResponse, PatientResponse, RegisterDoctorRequest, RegisterPatientRequest,
};
use clinic_server::{ClinicConfig, ClinicServer};
use database_layer::{ConsultationType, Specialization};

/// Server over fresh in-memory repositories
pub fn test_server() -> ClinicServer {
    ClinicServer::with_repositories(ClinicConfig::default(), &Repositories::in_memory())
}

pub fn patient_request(email: &str, phone: &str) -> RegisterPatientRequest {
    RegisterPatientRequest {
        first_name: "Jane".to_string(),
        last_name: "Roe".to_string(),
        email: email.to_string(),
        phone_number: phone.to_string(),
        date_of_birth: "1988-04-12".to_string(),
        ..Default::default()
    }
}

pub fn doctor_request(email: &str, phone: &str, license: &str) -> RegisterDoctorRequest {
    RegisterDoctorRequest {
        first_name: "Gregory".to_string(),
        last_name: "House".to_string(),
        email: email.to_string(),
        phone_number: phone.to_string(),
        specialization: Specialization::GeneralPractice,
        license_number: license.to_string(),
        years_of_experience: 12,
        consultation_fee: 5000,
        ..Default::default()
    }
}

pub fn booking(patient: &PatientResponse, doctor: &DoctorResponse, date: &str, time: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_id: patient.patient_id.clone(),
        doctor_id: doctor.doctor_id.clone(),
        appointment_date: date.to_string(),
        appointment_time: time.to_string(),
        consultation_type: ConsultationType::InPerson,
        reason_for_visit: "Persistent cough".to_string(),
        notes: String::new(),
    }
}

/// Registers one patient and one doctor
pub async fn seed(server: &ClinicServer) -> (PatientResponse, DoctorResponse) {
    let patient = server
        .patients
        .register_patient(patient_request("jane.roe@example.com", "555-010-2030"))
        .await
        .expect("Failed to register patient");
    let doctor = server
        .doctors
        .register_doctor(doctor_request("house@clinic.test", "555-010-9000", "MD-40213"))
        .await
        .expect("Failed to register doctor");
    (patient, doctor)
}
