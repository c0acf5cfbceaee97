//! Error handling module for the FARMLAND site backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const INVALID_PASSWORD: &str = "INVALID_PASSWORD";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const PASSWORD_MISMATCH: &str = "PASSWORD_MISMATCH";
    pub const WRONG_CURRENT_PASSWORD: &str = "WRONG_CURRENT_PASSWORD";
    pub const PASSWORD_TOO_SHORT: &str = "PASSWORD_TOO_SHORT";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const CONTACT_REJECTED: &str = "CONTACT_REJECTED";
    pub const CONTACT_UNREACHABLE: &str = "CONTACT_UNREACHABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Reasons a password change is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    /// New password and its confirmation differ
    Mismatch,
    /// Current password does not match the stored one
    WrongCurrent,
    /// New password is shorter than the minimum length
    TooShort,
}

impl PasswordError {
    fn code(self) -> &'static str {
        match self {
            PasswordError::Mismatch => codes::PASSWORD_MISMATCH,
            PasswordError::WrongCurrent => codes::WRONG_CURRENT_PASSWORD,
            PasswordError::TooShort => codes::PASSWORD_TOO_SHORT,
        }
    }

    fn message(self) -> &'static str {
        match self {
            PasswordError::Mismatch => "New password and confirmation do not match",
            PasswordError::WrongCurrent => "Current password is incorrect",
            PasswordError::TooShort => "New password must be at least 4 characters",
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Admin session required
    Unauthorized(String),
    /// Admin password rejected at login
    InvalidPassword,
    /// Resource not found
    NotFound(String),
    /// Validation error
    Validation(String),
    /// Password change refused
    Password(PasswordError),
    /// Content store read/write failure
    Storage(String),
    /// Contact endpoint answered with a failure status
    ContactRejected(String),
    /// Contact endpoint could not be reached
    ContactUnreachable(String),
    /// Internal server error
    Internal(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Password(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ContactRejected(_) => StatusCode::BAD_GATEWAY,
            AppError::ContactUnreachable(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::InvalidPassword => codes::INVALID_PASSWORD,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Password(reason) => reason.code(),
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::ContactRejected(_) => codes::CONTACT_REJECTED,
            AppError::ContactUnreachable(_) => codes::CONTACT_UNREACHABLE,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidPassword => "Incorrect admin password".to_string(),
            AppError::Password(reason) => reason.message().to_string(),
            AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Storage(msg)
            | AppError::ContactRejected(msg)
            | AppError::ContactUnreachable(msg)
            | AppError::Internal(msg)
            | AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<PasswordError> for AppError {
    fn from(reason: PasswordError) -> Self {
        AppError::Password(reason)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        AppError::Storage(format!("Storage error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Storage(format!("Serialization error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("Contact relay error: {:?}", err);
        AppError::ContactUnreachable(format!("Contact service unreachable: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub revision_id: i64,
}

impl ErrorResponse {
    pub fn new(error: &AppError, revision_id: i64) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
            revision_id,
        }
    }
}

/// Wrapper type for errors that carry revision_id context.
pub struct AppErrorWithRevision {
    pub error: AppError,
    pub revision_id: i64,
}

impl IntoResponse for AppErrorWithRevision {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.revision_id);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_errors_have_distinct_codes() {
        let mismatch = AppError::from(PasswordError::Mismatch);
        let wrong = AppError::from(PasswordError::WrongCurrent);
        let short = AppError::from(PasswordError::TooShort);

        assert_eq!(mismatch.error_code(), codes::PASSWORD_MISMATCH);
        assert_eq!(wrong.error_code(), codes::WRONG_CURRENT_PASSWORD);
        assert_eq!(short.error_code(), codes::PASSWORD_TOO_SHORT);
        assert_eq!(short.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::Validation("Title is required".to_string());
        assert_eq!(err.to_string(), "VALIDATION_ERROR: Title is required");
    }

    #[test]
    fn test_contact_errors_map_to_bad_gateway() {
        assert_eq!(
            AppError::ContactRejected("422".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::ContactUnreachable("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
