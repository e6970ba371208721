use axum::{response::Json, routing::get, Router};
use utoipa::OpenApi;

use crate::routes::paths;
use crate::server::ClinicServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::handlers::health::health_check,
        crate::handlers::health::version_info,

        // Patient endpoints
        crate::handlers::patients::register_patient,
        crate::handlers::patients::get_patient,
        crate::handlers::patients::update_patient,
        crate::handlers::patients::search_patients,
        crate::handlers::patients::get_medical_history,
        crate::handlers::patients::add_medical_record,

        // Doctor endpoints
        crate::handlers::doctors::register_doctor,
        crate::handlers::doctors::get_doctor,
        crate::handlers::doctors::update_doctor,
        crate::handlers::doctors::search_doctors,
        crate::handlers::doctors::set_availability,
        crate::handlers::doctors::get_doctor_availability,

        // Appointment endpoints
        crate::handlers::appointments::book_appointment,
        crate::handlers::appointments::get_appointment,
        crate::handlers::appointments::cancel_appointment,
        crate::handlers::appointments::reschedule_appointment,
        crate::handlers::appointments::complete_appointment,
        crate::handlers::appointments::get_available_slots,
        crate::handlers::appointments::get_patient_appointments,
        crate::handlers::appointments::get_doctor_appointments,

        // Prescription endpoints
        crate::handlers::prescriptions::create_prescription,
        crate::handlers::prescriptions::get_prescription,
        crate::handlers::prescriptions::get_patient_prescriptions,
        crate::handlers::prescriptions::get_doctor_prescriptions,
        crate::handlers::prescriptions::get_appointment_prescription,
    ),
    components(
        schemas(
            crate::error::ApiErrorResponse,
            crate::handlers::health::HealthResponse,
            crate::handlers::health::VersionResponse,

            database_layer::Gender,
            database_layer::BloodGroup,
            database_layer::Address,
            database_layer::VitalSigns,
            database_layer::Specialization,
            database_layer::AppointmentStatus,
            database_layer::ConsultationType,
            database_layer::Medication,

            crate::types::RegisterPatientRequest,
            crate::types::UpdatePatientRequest,
            crate::types::PatientResponse,
            crate::types::AddMedicalRecordRequest,
            crate::types::MedicalRecordSummary,
            crate::types::MedicalHistoryResponse,

            crate::types::RegisterDoctorRequest,
            crate::types::UpdateDoctorRequest,
            crate::types::DoctorResponse,
            crate::types::AvailabilitySlot,
            crate::types::SetAvailabilityRequest,
            crate::types::DoctorAvailabilityResponse,

            crate::types::BookAppointmentRequest,
            crate::types::CancelAppointmentRequest,
            crate::types::RescheduleAppointmentRequest,
            crate::types::CompleteAppointmentRequest,
            crate::types::AppointmentResponse,
            crate::types::TimeSlot,
            crate::types::AvailableSlotsResponse,

            crate::types::CreatePrescriptionRequest,
            crate::types::PrescriptionResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health and build information"),
        (name = "patients", description = "Patient registration and profiles"),
        (name = "medical-records", description = "Visit records and medical history"),
        (name = "doctors", description = "Doctor registration, profiles and weekly availability"),
        (name = "appointments", description = "Booking, rescheduling and the daily slot grid"),
        (name = "prescriptions", description = "Prescriptions and their validity window"),
    ),
    info(
        title = "Clinic Engine API",
        version = "1.0.0",
        description = "Patients, doctors, appointments, prescriptions and medical records for an outpatient clinic.",
        license(name = "MIT OR Apache-2.0"),
    ),
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create OpenAPI documentation routes
pub fn create_docs_routes() -> Router<ClinicServer> {
    Router::new().route(paths::health::OPENAPI_JSON, get(openapi_json))
}
