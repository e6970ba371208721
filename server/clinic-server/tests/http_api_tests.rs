//! HTTP API tests driven through the axum router
//!
//! These tests verify that:
//! 1. Successful calls return the `{ success, data }` envelope with the right status
//! 2. Service errors map to 400, 404, 409 and 422 with a structured error body
//! 3. Undecodable bodies are rejected with 400 before reaching a service

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use clinic_server::create_app;

fn app() -> Router {
    create_app(common::test_server())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("Failed to build request"))
        .await
        .expect("Router should not fail");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    };
    (status, value)
}

fn patient_body(email: &str, phone: &str) -> Value {
    json!({
        "first_name": "Jane",
        "last_name": "Roe",
        "email": email,
        "phone_number": phone,
        "date_of_birth": "1988-04-12",
        "gender": "FEMALE",
        "blood_group": "O_POSITIVE"
    })
}

fn doctor_body() -> Value {
    json!({
        "first_name": "Gregory",
        "last_name": "House",
        "email": "house@clinic.test",
        "phone_number": "555-010-9000",
        "specialization": "GENERAL_PRACTICE",
        "license_number": "MD-40213",
        "consultation_fee": 5000
    })
}

/// Registers a patient and a doctor, returning their IDs
async fn seed(app: &Router) -> (String, String) {
    let (status, patient) = send(
        app,
        Method::POST,
        "/api/v1/patients",
        Some(patient_body("jane.roe@example.com", "555-010-2030")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, doctor) = send(app, Method::POST, "/api/v1/doctors", Some(doctor_body())).await;
    assert_eq!(status, StatusCode::CREATED);

    (
        patient["data"]["patient_id"].as_str().unwrap_or_default().to_string(),
        doctor["data"]["doctor_id"].as_str().unwrap_or_default().to_string(),
    )
}

#[tokio::test]
async fn test_health_and_docs_are_served() {
    let app = app();

    let (status, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["checks"]["database"], "in-memory");

    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/appointments"].is_object());
}

#[tokio::test]
async fn test_register_patient_returns_envelope() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/patients",
        Some(patient_body("jane.roe@example.com", "555-010-2030")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["gender"], "FEMALE");
    assert_eq!(body["data"]["blood_group"], "O_POSITIVE");

    let id = body["data"]["patient_id"].as_str().unwrap_or_default();
    let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["email"], "jane.roe@example.com");

    let (status, listed) = send(&app, Method::GET, "/api/v1/patients?name=roe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["metadata"]["total_count"], 1);
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/patients",
        Some(patient_body("jane.roe@example.com", "555-010-7777")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "already_exists");
    assert_eq!(body["message"], "email already registered");
    assert!(body["error_id"].is_string());
}

#[tokio::test]
async fn test_validation_and_lookup_errors() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/patients",
        Some(json!({ "first_name": "Jane", "last_name": "Roe" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["message"], "email and phone_number are required");

    let (status, _) = send(&app, Method::GET, "/api/v1/patients/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(&app, Method::GET, &format!("/api/v1/doctors/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "doctor not found");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/appointments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .expect("Failed to build request");
    let response = app.oneshot(request).await.expect("Router should not fail");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("Body should be JSON");
    assert_eq!(body["error_type"], "bad_request");
}

#[tokio::test]
async fn test_appointment_lifecycle_over_http() {
    let app = app();
    let (patient_id, doctor_id) = seed(&app).await;

    let booking = json!({
        "patient_id": patient_id,
        "doctor_id": doctor_id,
        "appointment_date": "2025-03-03",
        "appointment_time": "10:00",
        "consultation_type": "IN_PERSON",
        "reason_for_visit": "Checkup"
    });

    let (status, booked) = send(&app, Method::POST, "/api/v1/appointments", Some(booking.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booked["data"]["status"], "SCHEDULED");
    let appointment_id = booked["data"]["appointment_id"].as_str().unwrap_or_default().to_string();

    let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/appointments/{appointment_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["patient_name"], "Jane Roe");
    assert_eq!(fetched["data"]["consultation_type"], "IN_PERSON");

    let (status, body) = send(&app, Method::POST, "/api/v1/appointments", Some(booking)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "time slot is already booked");

    let (status, slots) = send(
        &app,
        Method::GET,
        &format!("/api/v1/doctors/{doctor_id}/slots?date=2025-03-03"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slots["data"]["available_slots"].as_array().map(Vec::len), Some(16));
    assert_eq!(slots["data"]["available_slots"][2]["is_available"], false);

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/doctors/{doctor_id}/slots"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let cancel_uri = format!("/api/v1/appointments/{appointment_id}/cancel");
    let (status, cancelled) = send(&app, Method::POST, &cancel_uri, Some(json!({ "reason": "Travel" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["data"]["status"], "CANCELLED");
    assert_eq!(cancelled["data"]["cancellation_reason"], "Travel");

    let (status, body) = send(&app, Method::POST, &cancel_uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "invalid_transition");
    assert_eq!(body["message"], "appointment is already cancelled");

    let (status, listed) = send(
        &app,
        Method::GET,
        &format!("/api/v1/patients/{patient_id}/appointments?status=CANCELLED"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["metadata"]["total_count"], 1);
}

#[tokio::test]
async fn test_prescription_over_http() {
    let app = app();
    let (patient_id, doctor_id) = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/prescriptions",
        Some(json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "medications": [{
                "medication_name": "Ibuprofen",
                "dosage": "200mg",
                "frequency": "as needed",
                "duration": "5 days",
                "route": "oral",
                "instructions": "",
                "quantity": 10
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["is_active"], true);
    let id = body["data"]["prescription_id"].as_str().unwrap_or_default().to_string();

    let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/prescriptions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["medications"][0]["medication_name"], "Ibuprofen");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/prescriptions",
        Some(json!({ "patient_id": patient_id, "doctor_id": doctor_id, "medications": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "at least one medication is required");
}
