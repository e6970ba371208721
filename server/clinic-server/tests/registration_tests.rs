//! Registration and profile tests
//!
//! These tests verify that:
//! 1. Patient email and phone number are unique
//! 2. Doctor email, phone number and license number are unique
//! 3. Updates apply only the supplied fields and keep uniqueness
//! 4. Search filters combine and medical history is kept per patient

mod common;

use clinic_server::types::{
    AddMedicalRecordRequest, AvailabilitySlot, DateRangeQuery, SearchDoctorsQuery, SearchPatientsQuery,
    SetAvailabilityRequest, UpdatePatientRequest,
};
use common::{doctor_request, patient_request, test_server};
use database_layer::Specialization;
use error_common::ErrorKind;

#[tokio::test]
async fn test_patient_contact_details_are_unique() {
    let server = test_server();
    server
        .patients
        .register_patient(patient_request("jane.roe@example.com", "555-010-2030"))
        .await
        .expect("Failed to register patient");

    let err = server
        .patients
        .register_patient(patient_request("jane.roe@example.com", "555-010-7777"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.to_string(), "email already registered");

    let err = server
        .patients
        .register_patient(patient_request("someone.else@example.com", "555-010-2030"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "phone number already registered");
}

#[tokio::test]
async fn test_doctor_license_is_unique() {
    let server = test_server();
    server
        .doctors
        .register_doctor(doctor_request("house@clinic.test", "555-010-9000", "MD-40213"))
        .await
        .expect("Failed to register doctor");

    let err = server
        .doctors
        .register_doctor(doctor_request("house@clinic.test", "555-010-9999", "MD-99999"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "email already registered");

    let err = server
        .doctors
        .register_doctor(doctor_request("wilson@clinic.test", "555-010-9000", "MD-99999"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "phone number already registered");

    let err = server
        .doctors
        .register_doctor(doctor_request("wilson@clinic.test", "555-010-9999", "MD-40213"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.to_string(), "license number already registered");
}

#[tokio::test]
async fn test_registration_validates_required_fields() {
    let server = test_server();

    let err = server
        .patients
        .register_patient(patient_request("", "555-010-2030"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "email and phone_number are required");

    let err = server
        .doctors
        .register_doctor(doctor_request("house@clinic.test", "555-010-9000", ""))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "license_number is required");
}

#[tokio::test]
async fn test_patient_update_is_partial_and_keeps_uniqueness() {
    let server = test_server();
    let jane = server
        .patients
        .register_patient(patient_request("jane.roe@example.com", "555-010-2030"))
        .await
        .expect("Failed to register patient");
    server
        .patients
        .register_patient(patient_request("john.doe@example.com", "555-010-4040"))
        .await
        .expect("Failed to register patient");

    let updated = server
        .patients
        .update_patient(
            &jane.patient_id,
            UpdatePatientRequest {
                last_name: Some("Smith".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update patient");
    assert_eq!(updated.first_name, "Jane");
    assert_eq!(updated.last_name, "Smith");
    assert_eq!(updated.email, "jane.roe@example.com");

    let err = server
        .patients
        .update_patient(
            &jane.patient_id,
            UpdatePatientRequest {
                email: Some("john.doe@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "email already registered");

    let err = server
        .patients
        .get_patient(&uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "patient not found");
}

#[tokio::test]
async fn test_search_filters_combine() {
    let server = test_server();
    server
        .patients
        .register_patient(patient_request("jane.roe@example.com", "555-010-2030"))
        .await
        .expect("Failed to register patient");

    let found = server
        .patients
        .search_patients(SearchPatientsQuery {
            name: Some("ROE".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to search patients");
    assert_eq!(found.len(), 1);

    let found = server
        .patients
        .search_patients(SearchPatientsQuery {
            name: Some("roe".to_string()),
            email: Some("other@example.com".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to search patients");
    assert!(found.is_empty());

    server
        .doctors
        .register_doctor(doctor_request("house@clinic.test", "555-010-9000", "MD-40213"))
        .await
        .expect("Failed to register doctor");

    let general = server
        .doctors
        .search_doctors(SearchDoctorsQuery {
            specialization: Some(Specialization::GeneralPractice),
            is_available: Some(true),
            ..Default::default()
        })
        .await
        .expect("Failed to search doctors");
    assert_eq!(general.len(), 1);

    let cardiology = server
        .doctors
        .search_doctors(SearchDoctorsQuery {
            specialization: Some(Specialization::Cardiology),
            ..Default::default()
        })
        .await
        .expect("Failed to search doctors");
    assert!(cardiology.is_empty());
}

#[tokio::test]
async fn test_availability_is_replaced_wholesale() {
    let server = test_server();
    let doctor = server
        .doctors
        .register_doctor(doctor_request("house@clinic.test", "555-010-9000", "MD-40213"))
        .await
        .expect("Failed to register doctor");

    let window = |day: &str| AvailabilitySlot {
        day_of_week: day.to_string(),
        start_time: "09:00".to_string(),
        end_time: "12:00".to_string(),
        slot_duration_minutes: 0,
    };

    server
        .doctors
        .set_availability(
            &doctor.doctor_id,
            SetAvailabilityRequest {
                availability_slots: vec![window("MONDAY"), window("TUESDAY")],
            },
        )
        .await
        .expect("Failed to set availability");

    let replaced = server
        .doctors
        .set_availability(
            &doctor.doctor_id,
            SetAvailabilityRequest {
                availability_slots: vec![window("FRIDAY")],
            },
        )
        .await
        .expect("Failed to set availability");
    assert_eq!(replaced.availability_slots.len(), 1);
    assert_eq!(replaced.availability_slots[0].slot_duration_minutes, 30);

    let read = server
        .doctors
        .get_availability(&doctor.doctor_id)
        .await
        .expect("Failed to get availability");
    assert_eq!(read.availability_slots, replaced.availability_slots);

    let mut backwards = window("MONDAY");
    backwards.end_time = "08:00".to_string();
    let err = server
        .doctors
        .set_availability(
            &doctor.doctor_id,
            SetAvailabilityRequest {
                availability_slots: vec![backwards],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "start_time must be before end_time");
}

#[tokio::test]
async fn test_medical_history_belongs_to_patient() {
    let server = test_server();
    let (patient, doctor) = common::seed(&server).await;

    for (visit_date, diagnosis) in [("2025-01-10", "Influenza"), ("2025-02-20", "Sprained ankle")] {
        server
            .patients
            .add_medical_record(
                &patient.patient_id,
                AddMedicalRecordRequest {
                    doctor_id: doctor.doctor_id.clone(),
                    visit_date: Some(visit_date.to_string()),
                    diagnosis: diagnosis.to_string(),
                    record_type: "consultation".to_string(),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to add medical record");
    }

    let history = server
        .patients
        .get_medical_history(&patient.patient_id, DateRangeQuery::default())
        .await
        .expect("Failed to get medical history");
    assert_eq!(history.records.len(), 2);
    assert_eq!(history.records[0].diagnosis, "Sprained ankle");

    let february = server
        .patients
        .get_medical_history(
            &patient.patient_id,
            DateRangeQuery {
                from_date: Some("2025-02-01".to_string()),
                to_date: Some("2025-02-28".to_string()),
            },
        )
        .await
        .expect("Failed to get medical history");
    assert_eq!(february.records.len(), 1);
    assert_eq!(february.records[0].visit_date, "2025-02-20");
}
