//! Centralized API route path constants
//!
//! Runtime routes are built from these constants. utoipa `#[utoipa::path]`
//! attributes need string literals, so the paths written there must match
//! `API_V1` joined with the constant (with `:id` written as `{id}`).

/// API base path
pub const API_V1: &str = "/api/v1";

/// Health check and documentation endpoints
pub mod health {
    pub const HEALTH: &str = "/health";
    pub const VERSION: &str = "/version";
    pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
}

/// Patient endpoints
pub mod patients {
    pub const PATIENTS: &str = "/patients";
    pub const PATIENT_BY_ID: &str = "/patients/:id";
    pub const MEDICAL_HISTORY: &str = "/patients/:id/medical-history";
    pub const MEDICAL_RECORDS: &str = "/patients/:id/medical-records";
    pub const APPOINTMENTS: &str = "/patients/:id/appointments";
    pub const PRESCRIPTIONS: &str = "/patients/:id/prescriptions";
}

/// Doctor endpoints
pub mod doctors {
    pub const DOCTORS: &str = "/doctors";
    pub const DOCTOR_BY_ID: &str = "/doctors/:id";
    pub const AVAILABILITY: &str = "/doctors/:id/availability";
    pub const SLOTS: &str = "/doctors/:id/slots";
    pub const APPOINTMENTS: &str = "/doctors/:id/appointments";
    pub const PRESCRIPTIONS: &str = "/doctors/:id/prescriptions";
}

/// Appointment endpoints
pub mod appointments {
    pub const APPOINTMENTS: &str = "/appointments";
    pub const APPOINTMENT_BY_ID: &str = "/appointments/:id";
    pub const CANCEL: &str = "/appointments/:id/cancel";
    pub const RESCHEDULE: &str = "/appointments/:id/reschedule";
    pub const COMPLETE: &str = "/appointments/:id/complete";
    pub const PRESCRIPTION: &str = "/appointments/:id/prescription";
}

/// Prescription endpoints
pub mod prescriptions {
    pub const PRESCRIPTIONS: &str = "/prescriptions";
    pub const PRESCRIPTION_BY_ID: &str = "/prescriptions/:id";
}
