//! Logging with automatic PII redaction
//!
//! Request logs in a clinic carry patient emails, phone numbers and the
//! occasional SSN. [`RedactedLogger`] runs every message through a
//! [`PiiRedactor`] before handing it to `tracing`, so the subscriber never
//! sees the clear-text values.
//!
//! With `hash_for_correlation` enabled (the default) a redacted value is
//! replaced by a short SHA-256 prefix, letting operators correlate repeated
//! occurrences of the same email without learning it:
//!
//! ```text
//! RegisterPatient request: email=EMAIL[3q2+7wAAAAA=]
//! ```
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{redacted_info, RedactedLogger};
//!
//! let logger = RedactedLogger::new("patient_service");
//! redacted_info!(logger, "RegisterPatient request: email={}", "jane@example.com");
//! assert!(!logger.redact("jane@example.com").contains("jane"));
//! ```

pub mod config;
pub mod macros;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use std::sync::Arc;

/// Component-scoped logger that redacts PII before emitting through `tracing`
#[derive(Debug, Clone)]
pub struct RedactedLogger {
    component: String,
    redactor: Arc<PiiRedactor>,
    redaction_enabled: bool,
}

impl RedactedLogger {
    /// Logger with the default redaction rules
    pub fn new(component: impl Into<String>) -> Self {
        Self::with_config(component, &LoggerConfig::default())
    }

    pub fn with_config(component: impl Into<String>, config: &LoggerConfig) -> Self {
        let redaction = RedactionConfig {
            hash_for_correlation: config.hash_for_correlation,
            ..RedactionConfig::default()
        };

        Self {
            component: component.into(),
            redactor: Arc::new(PiiRedactor::new(redaction)),
            redaction_enabled: config.redaction_enabled,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn redact(&self, message: &str) -> String {
        if self.redaction_enabled {
            self.redactor.redact(message)
        } else {
            message.to_string()
        }
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(component = %self.component, "{}", self.redact(message));
    }

    pub fn info(&self, message: &str) {
        tracing::info!(component = %self.component, "{}", self.redact(message));
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(component = %self.component, "{}", self.redact(message));
    }

    pub fn error(&self, message: &str) {
        tracing::error!(component = %self.component, "{}", self.redact(message));
    }
}
