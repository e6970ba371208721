use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use logger_redacted::redacted_info;

use crate::error::{api_list, api_success, ApiError, ApiErrorResponse, ApiResponse};
use crate::server::ClinicServer;
use crate::types::{CreatePrescriptionRequest, DateRangeQuery, PrescriptionResponse};

/// Write a prescription
#[utoipa::path(
    post,
    path = "/api/v1/prescriptions",
    request_body = CreatePrescriptionRequest,
    responses(
        (status = 201, description = "Prescription created", body = PrescriptionResponse),
        (status = 400, description = "Missing IDs or medications", body = ApiErrorResponse),
        (status = 404, description = "Patient or doctor not found", body = ApiErrorResponse)
    ),
    tag = "prescriptions"
)]
pub async fn create_prescription(
    State(server): State<ClinicServer>,
    payload: Result<Json<CreatePrescriptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<PrescriptionResponse>>), ApiError> {
    let Json(req) = payload?;
    redacted_info!(
        server.logger,
        "CreatePrescription request: patient_id={} doctor_id={} medications={}",
        req.patient_id,
        req.doctor_id,
        req.medications.len()
    );

    let prescription = server.prescriptions.create_prescription(req).await?;
    Ok((StatusCode::CREATED, Json(api_success(prescription))))
}

/// Get a prescription by ID
#[utoipa::path(
    get,
    path = "/api/v1/prescriptions/{id}",
    params(
        ("id" = String, Path, description = "Prescription ID")
    ),
    responses(
        (status = 200, description = "Prescription found", body = PrescriptionResponse),
        (status = 404, description = "Prescription not found", body = ApiErrorResponse)
    ),
    tag = "prescriptions"
)]
pub async fn get_prescription(
    State(server): State<ClinicServer>,
    Path(prescription_id): Path<String>,
) -> Result<Json<ApiResponse<PrescriptionResponse>>, ApiError> {
    redacted_info!(server.logger, "GetPrescription request: prescription_id={}", prescription_id);

    let prescription = server.prescriptions.get_prescription(&prescription_id).await?;
    Ok(Json(api_success(prescription)))
}

/// Prescriptions issued to a patient, newest first
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/prescriptions",
    params(
        ("id" = String, Path, description = "Patient ID"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "Patient prescriptions", body = Vec<PrescriptionResponse>),
        (status = 400, description = "Malformed ID or date", body = ApiErrorResponse)
    ),
    tag = "prescriptions"
)]
pub async fn get_patient_prescriptions(
    State(server): State<ClinicServer>,
    Path(patient_id): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<PrescriptionResponse>>>, ApiError> {
    let Query(query) = query?;
    redacted_info!(server.logger, "GetPatientPrescriptions request: patient_id={}", patient_id);

    let prescriptions = server.prescriptions.get_patient_prescriptions(&patient_id, query).await?;
    Ok(Json(api_list(prescriptions)))
}

/// Prescriptions written by a doctor, newest first
#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}/prescriptions",
    params(
        ("id" = String, Path, description = "Doctor ID"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "Doctor prescriptions", body = Vec<PrescriptionResponse>),
        (status = 400, description = "Malformed ID or date", body = ApiErrorResponse)
    ),
    tag = "prescriptions"
)]
pub async fn get_doctor_prescriptions(
    State(server): State<ClinicServer>,
    Path(doctor_id): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<PrescriptionResponse>>>, ApiError> {
    let Query(query) = query?;
    redacted_info!(server.logger, "GetDoctorPrescriptions request: doctor_id={}", doctor_id);

    let prescriptions = server.prescriptions.get_doctor_prescriptions(&doctor_id, query).await?;
    Ok(Json(api_list(prescriptions)))
}

/// Prescription written during an appointment
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}/prescription",
    params(
        ("id" = String, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Prescription found", body = PrescriptionResponse),
        (status = 404, description = "No prescription for this appointment", body = ApiErrorResponse)
    ),
    tag = "prescriptions"
)]
pub async fn get_appointment_prescription(
    State(server): State<ClinicServer>,
    Path(appointment_id): Path<String>,
) -> Result<Json<ApiResponse<PrescriptionResponse>>, ApiError> {
    redacted_info!(
        server.logger,
        "GetAppointmentPrescription request: appointment_id={}",
        appointment_id
    );

    let prescription = server.prescriptions.get_appointment_prescription(&appointment_id).await?;
    Ok(Json(api_success(prescription)))
}
