//! HTTP handlers
//!
//! Handlers decode the request, log it through the server's
//! [`RedactedLogger`](logger_redacted::RedactedLogger) and delegate to the
//! business services. Decoding failures become `400` responses through
//! [`ApiError`](crate::error::ApiError).

pub mod appointments;
pub mod doctors;
pub mod health;
pub mod patients;
pub mod prescriptions;
