//! Application error type and its HTTP representation.
//!
//! Every layer returns [`AppError`]. Each variant carries a human-readable
//! message and a JSON `details` value; the API layer renders it as
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short URL not found", "details": {} } }
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::db_error::unique_violation_constraint;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request payload.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Target URL is not an absolute URL with a scheme and a host.
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    /// Every short code candidate collided.
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    UsernameTaken { message: String, details: Value },

    /// Uniqueness violation not covered by a more specific kind.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Unknown identifier or wrong password. Both cases are indistinguishable.
    #[error("{message}")]
    InvalidCredentials { message: String, details: Value },

    /// Missing, malformed, badly signed, expired or not-yet-valid token.
    #[error("{message}")]
    InvalidToken { message: String, details: Value },

    #[error("{message}")]
    HashingFailure { message: String, details: Value },

    /// Any storage error that is not otherwise classified.
    #[error("{message}")]
    StoreFailure { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }

    pub fn allocation_exhausted(attempts: usize) -> Self {
        Self::AllocationExhausted {
            message: "Failed to generate a unique short code".to_string(),
            details: json!({ "attempts": attempts }),
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn username_taken(username: &str) -> Self {
        Self::UsernameTaken {
            message: "Username already exists".to_string(),
            details: json!({ "username": username }),
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    /// The same error is returned for an unknown identifier and a wrong password.
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
            message: "Invalid credentials".to_string(),
            details: json!({}),
        }
    }

    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: "Invalid or expired token".to_string(),
            details: json!({ "reason": reason.into() }),
        }
    }

    pub fn hashing_failure() -> Self {
        Self::HashingFailure {
            message: "Failed to hash password".to_string(),
            details: json!({}),
        }
    }

    pub fn store_failure(message: impl Into<String>, details: Value) -> Self {
        Self::StoreFailure {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::InvalidUrl { .. } => "invalid_url",
            AppError::AllocationExhausted { .. } => "allocation_exhausted",
            AppError::NotFound { .. } => "not_found",
            AppError::UsernameTaken { .. } => "username_taken",
            AppError::Conflict { .. } => "conflict",
            AppError::InvalidCredentials { .. } => "invalid_credentials",
            AppError::InvalidToken { .. } => "invalid_token",
            AppError::HashingFailure { .. } => "hashing_failure",
            AppError::StoreFailure { .. } => "store_failure",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::UsernameTaken { .. } | AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::InvalidCredentials { .. } | AppError::InvalidToken { .. } => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AllocationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::HashingFailure { .. }
            | AppError::StoreFailure { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn parts(&self) -> (&str, &Value) {
        match self {
            AppError::Validation { message, details }
            | AppError::InvalidUrl { message, details }
            | AppError::AllocationExhausted { message, details }
            | AppError::NotFound { message, details }
            | AppError::UsernameTaken { message, details }
            | AppError::Conflict { message, details }
            | AppError::InvalidCredentials { message, details }
            | AppError::InvalidToken { message, details }
            | AppError::HashingFailure { message, details }
            | AppError::StoreFailure { message, details }
            | AppError::Internal { message, details } => (message, details),
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = self.parts();
        ErrorInfo {
            code: self.code(),
            message: message.to_string(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();

        // RFC 6750
        if matches!(self, AppError::InvalidToken { .. }) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(constraint) = unique_violation_constraint(&e) {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": constraint }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::store_failure("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            json!({ "fields": errors.to_string() }),
        )
    }
}
