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
    DoctorAvailabilityResponse, DoctorResponse, RegisterDoctorRequest, SearchDoctorsQuery, SetAvailabilityRequest,
    UpdateDoctorRequest,
};

/// Register a new doctor
#[utoipa::path(
    post,
    path = "/api/v1/doctors",
    request_body = RegisterDoctorRequest,
    responses(
        (status = 201, description = "Doctor registered", body = DoctorResponse),
        (status = 400, description = "Missing or malformed field", body = ApiErrorResponse),
        (status = 409, description = "Email, phone number or license already registered", body = ApiErrorResponse)
    ),
    tag = "doctors"
)]
pub async fn register_doctor(
    State(server): State<ClinicServer>,
    payload: Result<Json<RegisterDoctorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<DoctorResponse>>), ApiError> {
    let Json(req) = payload?;
    redacted_info!(
        server.logger,
        "RegisterDoctor request: email={} license={}",
        req.email,
        req.license_number
    );

    let doctor = server.doctors.register_doctor(req).await?;
    Ok((StatusCode::CREATED, Json(api_success(doctor))))
}

/// Get a doctor by ID
#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}",
    params(
        ("id" = String, Path, description = "Doctor ID")
    ),
    responses(
        (status = 200, description = "Doctor found", body = DoctorResponse),
        (status = 400, description = "Malformed doctor ID", body = ApiErrorResponse),
        (status = 404, description = "Doctor not found", body = ApiErrorResponse)
    ),
    tag = "doctors"
)]
pub async fn get_doctor(
    State(server): State<ClinicServer>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<DoctorResponse>>, ApiError> {
    redacted_info!(server.logger, "GetDoctor request: doctor_id={}", doctor_id);

    let doctor = server.doctors.get_doctor(&doctor_id).await?;
    Ok(Json(api_success(doctor)))
}

/// Update contact details, fee or availability flag of a doctor
#[utoipa::path(
    put,
    path = "/api/v1/doctors/{id}",
    params(
        ("id" = String, Path, description = "Doctor ID")
    ),
    request_body = UpdateDoctorRequest,
    responses(
        (status = 200, description = "Doctor updated", body = DoctorResponse),
        (status = 400, description = "Invalid field value", body = ApiErrorResponse),
        (status = 404, description = "Doctor not found", body = ApiErrorResponse)
    ),
    tag = "doctors"
)]
pub async fn update_doctor(
    State(server): State<ClinicServer>,
    Path(doctor_id): Path<String>,
    payload: Result<Json<UpdateDoctorRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DoctorResponse>>, ApiError> {
    let Json(req) = payload?;
    redacted_info!(server.logger, "UpdateDoctor request: doctor_id={}", doctor_id);

    let doctor = server.doctors.update_doctor(&doctor_id, req).await?;
    Ok(Json(api_success(doctor)))
}

/// Search doctors by name, specialization and availability
#[utoipa::path(
    get,
    path = "/api/v1/doctors",
    params(SearchDoctorsQuery),
    responses(
        (status = 200, description = "Matching doctors", body = Vec<DoctorResponse>),
        (status = 400, description = "Malformed query", body = ApiErrorResponse)
    ),
    tag = "doctors"
)]
pub async fn search_doctors(
    State(server): State<ClinicServer>,
    query: Result<Query<SearchDoctorsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<DoctorResponse>>>, ApiError> {
    let Query(query) = query?;
    redacted_info!(
        server.logger,
        "SearchDoctors request: name={:?} specialization={:?} is_available={:?}",
        query.name,
        query.specialization,
        query.is_available
    );

    let doctors = server.doctors.search_doctors(query).await?;
    Ok(Json(api_list(doctors)))
}

/// Replace the weekly availability of a doctor
#[utoipa::path(
    put,
    path = "/api/v1/doctors/{id}/availability",
    params(
        ("id" = String, Path, description = "Doctor ID")
    ),
    request_body = SetAvailabilityRequest,
    responses(
        (status = 200, description = "Availability replaced", body = DoctorAvailabilityResponse),
        (status = 400, description = "Malformed availability window", body = ApiErrorResponse),
        (status = 404, description = "Doctor not found", body = ApiErrorResponse)
    ),
    tag = "doctors"
)]
pub async fn set_availability(
    State(server): State<ClinicServer>,
    Path(doctor_id): Path<String>,
    payload: Result<Json<SetAvailabilityRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DoctorAvailabilityResponse>>, ApiError> {
    let Json(req) = payload?;
    redacted_info!(
        server.logger,
        "SetAvailability request: doctor_id={} windows={}",
        doctor_id,
        req.availability_slots.len()
    );

    let availability = server.doctors.set_availability(&doctor_id, req).await?;
    Ok(Json(api_success(availability)))
}

/// Weekly availability of a doctor
#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}/availability",
    params(
        ("id" = String, Path, description = "Doctor ID")
    ),
    responses(
        (status = 200, description = "Availability windows", body = DoctorAvailabilityResponse),
        (status = 404, description = "Doctor not found", body = ApiErrorResponse)
    ),
    tag = "doctors"
)]
pub async fn get_doctor_availability(
    State(server): State<ClinicServer>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<DoctorAvailabilityResponse>>, ApiError> {
    redacted_info!(server.logger, "GetDoctorAvailability request: doctor_id={}", doctor_id);

    let availability = server.doctors.get_availability(&doctor_id).await?;
    Ok(Json(api_success(availability)))
}
