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
    AppointmentResponse, AvailableSlotsQuery, AvailableSlotsResponse, BookAppointmentRequest,
    CancelAppointmentRequest, CompleteAppointmentRequest, DoctorAppointmentsQuery, PatientAppointmentsQuery,
    RescheduleAppointmentRequest,
};

/// Book an appointment slot
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Missing or malformed field", body = ApiErrorResponse),
        (status = 404, description = "Patient or doctor not found", body = ApiErrorResponse),
        (status = 409, description = "Doctor unavailable or slot already booked", body = ApiErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn book_appointment(
    State(server): State<ClinicServer>,
    payload: Result<Json<BookAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentResponse>>), ApiError> {
    let Json(req) = payload?;
    redacted_info!(
        server.logger,
        "BookAppointment request: patient_id={} doctor_id={} slot={} {}",
        req.patient_id,
        req.doctor_id,
        req.appointment_date,
        req.appointment_time
    );

    let appointment = server.appointments.book_appointment(req).await?;
    Ok((StatusCode::CREATED, Json(api_success(appointment))))
}

/// Get an appointment by ID
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(
        ("id" = String, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment found", body = AppointmentResponse),
        (status = 404, description = "Appointment not found", body = ApiErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn get_appointment(
    State(server): State<ClinicServer>,
    Path(appointment_id): Path<String>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ApiError> {
    redacted_info!(server.logger, "GetAppointment request: appointment_id={}", appointment_id);

    let appointment = server.appointments.get_appointment(&appointment_id).await?;
    Ok(Json(api_success(appointment)))
}

/// Cancel an appointment and release its slot
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/cancel",
    params(
        ("id" = String, Path, description = "Appointment ID")
    ),
    request_body = CancelAppointmentRequest,
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentResponse),
        (status = 404, description = "Appointment not found", body = ApiErrorResponse),
        (status = 422, description = "Appointment already cancelled or completed", body = ApiErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn cancel_appointment(
    State(server): State<ClinicServer>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<CancelAppointmentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ApiError> {
    let Json(req) = payload?;
    redacted_info!(server.logger, "CancelAppointment request: appointment_id={}", appointment_id);

    let appointment = server.appointments.cancel_appointment(&appointment_id, req).await?;
    Ok(Json(api_success(appointment)))
}

/// Move an appointment to another slot of the same doctor
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/reschedule",
    params(
        ("id" = String, Path, description = "Appointment ID")
    ),
    request_body = RescheduleAppointmentRequest,
    responses(
        (status = 200, description = "Appointment rescheduled", body = AppointmentResponse),
        (status = 400, description = "Missing or malformed date or time", body = ApiErrorResponse),
        (status = 404, description = "Appointment not found", body = ApiErrorResponse),
        (status = 409, description = "New slot already booked", body = ApiErrorResponse),
        (status = 422, description = "Appointment already cancelled or completed", body = ApiErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn reschedule_appointment(
    State(server): State<ClinicServer>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<RescheduleAppointmentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ApiError> {
    let Json(req) = payload?;
    redacted_info!(
        server.logger,
        "RescheduleAppointment request: appointment_id={} new_slot={} {}",
        appointment_id,
        req.new_appointment_date,
        req.new_appointment_time
    );

    let appointment = server.appointments.reschedule_appointment(&appointment_id, req).await?;
    Ok(Json(api_success(appointment)))
}

/// Mark an appointment as completed
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/complete",
    params(
        ("id" = String, Path, description = "Appointment ID")
    ),
    request_body = CompleteAppointmentRequest,
    responses(
        (status = 200, description = "Appointment completed", body = AppointmentResponse),
        (status = 404, description = "Appointment not found", body = ApiErrorResponse),
        (status = 422, description = "Appointment already cancelled or completed", body = ApiErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn complete_appointment(
    State(server): State<ClinicServer>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<CompleteAppointmentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ApiError> {
    let Json(req) = payload?;
    redacted_info!(server.logger, "CompleteAppointment request: appointment_id={}", appointment_id);

    let appointment = server.appointments.complete_appointment(&appointment_id, req).await?;
    Ok(Json(api_success(appointment)))
}

/// Half-hour slots of a doctor's working day
#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}/slots",
    params(
        ("id" = String, Path, description = "Doctor ID"),
        AvailableSlotsQuery
    ),
    responses(
        (status = 200, description = "Slots for the day", body = AvailableSlotsResponse),
        (status = 400, description = "Missing or malformed date", body = ApiErrorResponse),
        (status = 404, description = "Doctor not found", body = ApiErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn get_available_slots(
    State(server): State<ClinicServer>,
    Path(doctor_id): Path<String>,
    query: Result<Query<AvailableSlotsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<AvailableSlotsResponse>>, ApiError> {
    let Query(query) = query?;
    redacted_info!(
        server.logger,
        "GetAvailableSlots request: doctor_id={} date={}",
        doctor_id,
        query.date
    );

    let slots = server.appointments.get_available_slots(&doctor_id, &query.date).await?;
    Ok(Json(api_success(slots)))
}

/// Appointments of a patient, newest first
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/appointments",
    params(
        ("id" = String, Path, description = "Patient ID"),
        PatientAppointmentsQuery
    ),
    responses(
        (status = 200, description = "Patient appointments", body = Vec<AppointmentResponse>),
        (status = 400, description = "Malformed ID, status or date", body = ApiErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn get_patient_appointments(
    State(server): State<ClinicServer>,
    Path(patient_id): Path<String>,
    query: Result<Query<PatientAppointmentsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, ApiError> {
    let Query(query) = query?;
    redacted_info!(server.logger, "GetPatientAppointments request: patient_id={}", patient_id);

    let appointments = server.appointments.get_patient_appointments(&patient_id, query).await?;
    Ok(Json(api_list(appointments)))
}

/// Appointments of a doctor in time order
#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}/appointments",
    params(
        ("id" = String, Path, description = "Doctor ID"),
        DoctorAppointmentsQuery
    ),
    responses(
        (status = 200, description = "Doctor appointments", body = Vec<AppointmentResponse>),
        (status = 400, description = "Malformed ID, status or date", body = ApiErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn get_doctor_appointments(
    State(server): State<ClinicServer>,
    Path(doctor_id): Path<String>,
    query: Result<Query<DoctorAppointmentsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, ApiError> {
    let Query(query) = query?;
    redacted_info!(server.logger, "GetDoctorAppointments request: doctor_id={}", doctor_id);

    let appointments = server.appointments.get_doctor_appointments(&doctor_id, query).await?;
    Ok(Json(api_list(appointments)))
}
