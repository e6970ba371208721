//! Prescription lifecycle tests
//!
//! These tests verify that:
//! 1. A missing or non-positive validity falls back to 30 days
//! 2. Expired prescriptions read as inactive while the stored row is untouched
//! 3. Prescriptions can be found by patient, doctor and appointment
//! 4. Validity longer than a hundred years is rejected instead of overflowing

mod common;

use chrono::{Duration, NaiveDate, Utc};
use clinic_server::services::Repositories;
use clinic_server::types::{CreatePrescriptionRequest, DateRangeQuery, MAX_VALIDITY_DAYS};
use clinic_server::{ClinicConfig, ClinicServer};
use common::{booking, seed};
use database_layer::repository::PrescriptionRepository;
use database_layer::{Medication, Prescription};
use error_common::ErrorKind;
use uuid::Uuid;

fn amoxicillin() -> Medication {
    Medication {
        medication_name: "Amoxicillin".to_string(),
        dosage: "500mg".to_string(),
        frequency: "3x daily".to_string(),
        duration: "7 days".to_string(),
        route: "oral".to_string(),
        instructions: "Take with food".to_string(),
        quantity: 21,
    }
}

fn request(patient_id: &str, doctor_id: &str, validity_days: i32) -> CreatePrescriptionRequest {
    CreatePrescriptionRequest {
        patient_id: patient_id.to_string(),
        doctor_id: doctor_id.to_string(),
        medications: vec![amoxicillin()],
        diagnosis: "Strep throat".to_string(),
        validity_days,
        ..Default::default()
    }
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("Failed to parse date")
}

#[tokio::test]
async fn test_default_validity_is_thirty_days() {
    let server = common::test_server();
    let (patient, doctor) = seed(&server).await;

    for validity_days in [0, -5] {
        let prescription = server
            .prescriptions
            .create_prescription(request(&patient.patient_id, &doctor.doctor_id, validity_days))
            .await
            .expect("Failed to create prescription");

        let span = date(&prescription.valid_until) - date(&prescription.prescription_date);
        assert_eq!(span.num_days(), 30);
        assert!(prescription.is_active);
        assert_eq!(prescription.patient_name, "Jane Roe");
        assert_eq!(prescription.doctor_name, "Gregory House");
    }

    let short = server
        .prescriptions
        .create_prescription(request(&patient.patient_id, &doctor.doctor_id, 5))
        .await
        .expect("Failed to create prescription");
    let span = date(&short.valid_until) - date(&short.prescription_date);
    assert_eq!(span.num_days(), 5);
}

#[tokio::test]
async fn test_oversized_validity_is_rejected() {
    let server = common::test_server();
    let (patient, doctor) = seed(&server).await;

    for validity_days in [MAX_VALIDITY_DAYS + 1, i32::MAX] {
        let err = server
            .prescriptions
            .create_prescription(request(&patient.patient_id, &doctor.doctor_id, validity_days))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "validity_days is out of range");
    }

    let longest = server
        .prescriptions
        .create_prescription(request(&patient.patient_id, &doctor.doctor_id, MAX_VALIDITY_DAYS))
        .await
        .expect("Failed to create prescription");
    let span = date(&longest.valid_until) - date(&longest.prescription_date);
    assert_eq!(span.num_days(), i64::from(MAX_VALIDITY_DAYS));

    let listed = server
        .prescriptions
        .get_patient_prescriptions(&patient.patient_id, DateRangeQuery::default())
        .await
        .expect("Failed to list prescriptions");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_expired_prescription_reads_inactive() {
    let repos = Repositories::in_memory();
    let server = ClinicServer::with_repositories(ClinicConfig::default(), &repos);
    let (patient, doctor) = seed(&server).await;

    let issued = Utc::now() - Duration::days(40);
    let stored = Prescription {
        id: Uuid::new_v4(),
        appointment_id: None,
        patient_id: patient.patient_id.parse().expect("Failed to parse patient id"),
        patient_name: "Jane Roe".to_string(),
        doctor_id: doctor.doctor_id.parse().expect("Failed to parse doctor id"),
        doctor_name: "Gregory House".to_string(),
        medications: vec![amoxicillin()],
        diagnosis: "Strep throat".to_string(),
        additional_instructions: String::new(),
        prescription_date: issued,
        valid_until: issued + Duration::days(30),
        is_active: true,
        created_at: issued,
    };
    repos
        .prescriptions
        .create(&stored)
        .await
        .expect("Failed to store prescription");

    let read = server
        .prescriptions
        .get_prescription(&stored.id.to_string())
        .await
        .expect("Failed to get prescription");
    assert!(!read.is_active);

    let listed = server
        .prescriptions
        .get_patient_prescriptions(&patient.patient_id, DateRangeQuery::default())
        .await
        .expect("Failed to list prescriptions");
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_active);

    let row = repos
        .prescriptions
        .get(stored.id)
        .await
        .expect("Failed to read stored row")
        .expect("Stored row should exist");
    assert!(row.is_active, "reads must not rewrite the stored flag");
}

#[tokio::test]
async fn test_prescription_lookups() {
    let server = common::test_server();
    let (patient, doctor) = seed(&server).await;

    let appointment = server
        .appointments
        .book_appointment(booking(&patient, &doctor, "2025-03-03", "10:00"))
        .await
        .expect("Failed to book appointment");

    let mut req = request(&patient.patient_id, &doctor.doctor_id, 14);
    req.appointment_id = Some(appointment.appointment_id.clone());
    let created = server
        .prescriptions
        .create_prescription(req)
        .await
        .expect("Failed to create prescription");
    assert_eq!(created.appointment_id.as_deref(), Some(appointment.appointment_id.as_str()));

    let by_appointment = server
        .prescriptions
        .get_appointment_prescription(&appointment.appointment_id)
        .await
        .expect("Failed to get appointment prescription");
    assert_eq!(by_appointment.prescription_id, created.prescription_id);

    let by_doctor = server
        .prescriptions
        .get_doctor_prescriptions(&doctor.doctor_id, DateRangeQuery::default())
        .await
        .expect("Failed to list doctor prescriptions");
    assert_eq!(by_doctor.len(), 1);

    let future = DateRangeQuery {
        from_date: Some("2999-01-01".to_string()),
        to_date: None,
    };
    let none = server
        .prescriptions
        .get_doctor_prescriptions(&doctor.doctor_id, future)
        .await
        .expect("Failed to list doctor prescriptions");
    assert!(none.is_empty());

    let err = server
        .prescriptions
        .get_prescription(&Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "prescription not found");
}

#[tokio::test]
async fn test_prescription_requires_medications_and_parties() {
    let server = common::test_server();
    let (patient, doctor) = seed(&server).await;

    let mut req = request(&patient.patient_id, &doctor.doctor_id, 0);
    req.medications.clear();
    let err = server.prescriptions.create_prescription(req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "at least one medication is required");

    let err = server
        .prescriptions
        .create_prescription(request(&patient.patient_id, &Uuid::new_v4().to_string(), 0))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "doctor not found");
}
