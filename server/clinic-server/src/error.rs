use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use error_common::{codes, ClinicError, ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error category
    #[schema(example = "conflict")]
    pub error_type: String,
    /// Stable error code
    #[schema(example = "SCHEDULING_3001")]
    pub code: String,
    /// Human-readable error message
    #[schema(example = "time slot is already booked")]
    pub message: String,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Suggested actions for resolving the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Standard API success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

/// Response metadata for listings
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    /// Failure reported by a business service
    #[error(transparent)]
    Clinic(#[from] ClinicError),

    /// The request could not be decoded
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a simple validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Clinic(ClinicError::validation(message))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Clinic(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::AlreadyExists | ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::InvalidTransition => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Clinic(err) => match err.kind() {
                ErrorKind::Validation => "validation_error",
                ErrorKind::NotFound => "not_found",
                ErrorKind::AlreadyExists => "already_exists",
                ErrorKind::Conflict => "conflict",
                ErrorKind::InvalidTransition => "invalid_transition",
                ErrorKind::Storage => "storage_error",
            },
            Self::BadRequest { .. } => "bad_request",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Clinic(err) => err.code(),
            Self::BadRequest { .. } => codes::server::MALFORMED_REQUEST,
            Self::Internal { .. } => codes::server::INTERNAL_ERROR,
        }
    }

    /// Message returned to the caller; storage and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Clinic(err) => err.public_message(),
            Self::BadRequest { message } => message.clone(),
            Self::Internal { .. } => "internal server error".to_string(),
        }
    }

    /// Get suggested actions for resolving the error
    pub fn suggestions(&self) -> Option<Vec<String>> {
        let Self::Clinic(err) = self else {
            return None;
        };
        let hints: &[&str] = match err.kind() {
            ErrorKind::Validation => &[
                "Ensure all required fields are provided",
                "Dates use YYYY-MM-DD and times use HH:MM",
            ],
            ErrorKind::NotFound => &["Verify the resource ID is correct"],
            ErrorKind::AlreadyExists => &["Look up the existing record instead of registering it again"],
            ErrorKind::Conflict => &["Query the doctor's available slots and pick a free one"],
            ErrorKind::InvalidTransition => &["Cancelled and completed appointments cannot be changed"],
            ErrorKind::Storage => &["Try again in a few moments", "Contact support if the issue persists"],
        };
        Some(hints.iter().map(ToString::to_string).collect())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "API error occurred"
            );
        } else {
            warn!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "Request rejected"
            );
        }

        let error_response = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            code: self.code().to_string(),
            message: self.public_message(),
            timestamp: chrono::Utc::now(),
            suggestions: self.suggestions(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Helper function to create successful API responses
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
        metadata: None,
    }
}

/// Listing response carrying the number of items
pub fn api_list<T>(items: Vec<T>) -> ApiResponse<Vec<T>> {
    let metadata = ResponseMetadata {
        total_count: Some(items.len()),
    };
    ApiResponse {
        success: true,
        data: items,
        metadata: Some(metadata),
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
