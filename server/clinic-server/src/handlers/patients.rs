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
use crate::types::{
    AddMedicalRecordRequest, DateRangeQuery, MedicalHistoryResponse, MedicalRecordSummary, PatientResponse,
    RegisterPatientRequest, SearchPatientsQuery, UpdatePatientRequest,
};

/// Register a new patient
#[utoipa::path(
    post,
    path = "/api/v1/patients",
    request_body = RegisterPatientRequest,
    responses(
        (status = 201, description = "Patient registered", body = PatientResponse),
        (status = 400, description = "Missing or malformed field", body = ApiErrorResponse),
        (status = 409, description = "Email or phone number already registered", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "patients"
)]
pub async fn register_patient(
    State(server): State<ClinicServer>,
    payload: Result<Json<RegisterPatientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<PatientResponse>>), ApiError> {
    let Json(req) = payload?;
    redacted_info!(
        server.logger,
        "RegisterPatient request: email={} phone={}",
        req.email,
        req.phone_number
    );

    let patient = server.patients.register_patient(req).await?;
    Ok((StatusCode::CREATED, Json(api_success(patient))))
}

/// Get a patient by ID
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient ID")
    ),
    responses(
        (status = 200, description = "Patient found", body = PatientResponse),
        (status = 400, description = "Malformed patient ID", body = ApiErrorResponse),
        (status = 404, description = "Patient not found", body = ApiErrorResponse)
    ),
    tag = "patients"
)]
pub async fn get_patient(
    State(server): State<ClinicServer>,
    Path(patient_id): Path<String>,
) -> Result<Json<ApiResponse<PatientResponse>>, ApiError> {
    redacted_info!(server.logger, "GetPatient request: patient_id={}", patient_id);

    let patient = server.patients.get_patient(&patient_id).await?;
    Ok(Json(api_success(patient)))
}

/// Update the supplied fields of a patient
#[utoipa::path(
    put,
    path = "/api/v1/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient ID")
    ),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = PatientResponse),
        (status = 400, description = "Invalid field value", body = ApiErrorResponse),
        (status = 404, description = "Patient not found", body = ApiErrorResponse),
        (status = 409, description = "Email or phone number already registered", body = ApiErrorResponse)
    ),
    tag = "patients"
)]
pub async fn update_patient(
    State(server): State<ClinicServer>,
    Path(patient_id): Path<String>,
    payload: Result<Json<UpdatePatientRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PatientResponse>>, ApiError> {
    let Json(req) = payload?;
    redacted_info!(server.logger, "UpdatePatient request: patient_id={}", patient_id);

    let patient = server.patients.update_patient(&patient_id, req).await?;
    Ok(Json(api_success(patient)))
}

/// Search patients by name, email, phone number or ID
#[utoipa::path(
    get,
    path = "/api/v1/patients",
    params(SearchPatientsQuery),
    responses(
        (status = 200, description = "Matching patients", body = Vec<PatientResponse>),
        (status = 400, description = "Malformed query", body = ApiErrorResponse)
    ),
    tag = "patients"
)]
pub async fn search_patients(
    State(server): State<ClinicServer>,
    query: Result<Query<SearchPatientsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<PatientResponse>>>, ApiError> {
    let Query(query) = query?;
    redacted_info!(
        server.logger,
        "SearchPatients request: name={:?} email={:?} phone={:?}",
        query.name,
        query.email,
        query.phone_number
    );

    let patients = server.patients.search_patients(query).await?;
    Ok(Json(api_list(patients)))
}

/// Medical history of a patient, newest visit first
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/medical-history",
    params(
        ("id" = String, Path, description = "Patient ID"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "Medical history", body = MedicalHistoryResponse),
        (status = 400, description = "Malformed ID or date", body = ApiErrorResponse),
        (status = 404, description = "Patient not found", body = ApiErrorResponse)
    ),
    tag = "medical-records"
)]
pub async fn get_medical_history(
    State(server): State<ClinicServer>,
    Path(patient_id): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<MedicalHistoryResponse>>, ApiError> {
    let Query(query) = query?;
    redacted_info!(server.logger, "GetMedicalHistory request: patient_id={}", patient_id);

    let history = server.patients.get_medical_history(&patient_id, query).await?;
    Ok(Json(api_success(history)))
}

/// Add a medical record to a patient's history
#[utoipa::path(
    post,
    path = "/api/v1/patients/{id}/medical-records",
    params(
        ("id" = String, Path, description = "Patient ID")
    ),
    request_body = AddMedicalRecordRequest,
    responses(
        (status = 201, description = "Record added", body = MedicalRecordSummary),
        (status = 400, description = "Missing or malformed field", body = ApiErrorResponse),
        (status = 404, description = "Patient or doctor not found", body = ApiErrorResponse)
    ),
    tag = "medical-records"
)]
pub async fn add_medical_record(
    State(server): State<ClinicServer>,
    Path(patient_id): Path<String>,
    payload: Result<Json<AddMedicalRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<MedicalRecordSummary>>), ApiError> {
    let Json(req) = payload?;
    redacted_info!(
        server.logger,
        "AddMedicalRecord request: patient_id={} doctor_id={}",
        patient_id,
        req.doctor_id
    );

    let record = server.patients.add_medical_record(&patient_id, req).await?;
    Ok((StatusCode::CREATED, Json(api_success(record))))
}
