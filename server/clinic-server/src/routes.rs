pub mod paths;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{appointments, doctors, health, patients, prescriptions},
    openapi,
    server::ClinicServer,
};

/// Create health check routes
pub fn health_routes() -> Router<ClinicServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::VERSION, get(health::version_info))
}

/// Create patient routes
pub fn patient_routes() -> Router<ClinicServer> {
    Router::new()
        .route(
            paths::patients::PATIENTS,
            post(patients::register_patient).get(patients::search_patients),
        )
        .route(
            paths::patients::PATIENT_BY_ID,
            get(patients::get_patient).put(patients::update_patient),
        )
        .route(paths::patients::MEDICAL_HISTORY, get(patients::get_medical_history))
        .route(paths::patients::MEDICAL_RECORDS, post(patients::add_medical_record))
        .route(paths::patients::APPOINTMENTS, get(appointments::get_patient_appointments))
        .route(paths::patients::PRESCRIPTIONS, get(prescriptions::get_patient_prescriptions))
}

/// Create doctor routes
pub fn doctor_routes() -> Router<ClinicServer> {
    Router::new()
        .route(
            paths::doctors::DOCTORS,
            post(doctors::register_doctor).get(doctors::search_doctors),
        )
        .route(
            paths::doctors::DOCTOR_BY_ID,
            get(doctors::get_doctor).put(doctors::update_doctor),
        )
        .route(
            paths::doctors::AVAILABILITY,
            get(doctors::get_doctor_availability).put(doctors::set_availability),
        )
        .route(paths::doctors::SLOTS, get(appointments::get_available_slots))
        .route(paths::doctors::APPOINTMENTS, get(appointments::get_doctor_appointments))
        .route(paths::doctors::PRESCRIPTIONS, get(prescriptions::get_doctor_prescriptions))
}

/// Create appointment routes
pub fn appointment_routes() -> Router<ClinicServer> {
    Router::new()
        .route(paths::appointments::APPOINTMENTS, post(appointments::book_appointment))
        .route(paths::appointments::APPOINTMENT_BY_ID, get(appointments::get_appointment))
        .route(paths::appointments::CANCEL, post(appointments::cancel_appointment))
        .route(paths::appointments::RESCHEDULE, post(appointments::reschedule_appointment))
        .route(paths::appointments::COMPLETE, post(appointments::complete_appointment))
        .route(
            paths::appointments::PRESCRIPTION,
            get(prescriptions::get_appointment_prescription),
        )
}

/// Create prescription routes
pub fn prescription_routes() -> Router<ClinicServer> {
    Router::new()
        .route(paths::prescriptions::PRESCRIPTIONS, post(prescriptions::create_prescription))
        .route(
            paths::prescriptions::PRESCRIPTION_BY_ID,
            get(prescriptions::get_prescription),
        )
}

/// Create API v1 routes
pub fn api_v1_routes() -> Router<ClinicServer> {
    Router::new()
        .merge(patient_routes())
        .merge(doctor_routes())
        .merge(appointment_routes())
        .merge(prescription_routes())
}

/// Create all application routes
pub fn create_routes() -> Router<ClinicServer> {
    Router::new()
        // Health check routes
        .merge(health_routes())
        // API documentation routes
        .merge(openapi::create_docs_routes())
        .nest(paths::API_V1, api_v1_routes())
}
