//! Error types for the terms HTTP layer.
//!
//! This module defines:
//! - `ApiError` struct for structured error responses
//! - `ErrorCode` enum for categorizing errors
//! - `IntoResponse` implementation for Axum HTTP responses
//!
//! Errors are serialized as JSON with the appropriate HTTP status code.
//! Challenge failures on the agreement form are the exception: the form
//! handler recovers them and re-renders the page, so they never reach
//! the JSON path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use terms_core::{ChallengeError, ConfigError, StorageError, TermsVersion};

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request lacks an identity reference where one is required
    Unauthorized,

    /// Request is not allowed (failed upload credentials)
    Forbidden,

    /// Request validation failed
    ValidationFailed,

    /// Agreement submission failed the integrity tag check
    IntegrityCheckFailed,

    /// Agreement challenge is older than the accepted window
    ChallengeExpired,

    /// Request contains invalid input data
    InvalidInput,

    /// No terms have been published yet
    TermsNotFound,

    /// Requested terms version does not exist
    VersionNotFound,

    /// Storage operation failed
    StorageFailure,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,

            ErrorCode::Forbidden => StatusCode::FORBIDDEN,

            ErrorCode::ValidationFailed
            | ErrorCode::IntegrityCheckFailed
            | ErrorCode::ChallengeExpired
            | ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,

            ErrorCode::TermsNotFound | ErrorCode::VersionNotFound => StatusCode::NOT_FOUND,

            ErrorCode::StorageFailure | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "Identity required",
            ErrorCode::Forbidden => "Access forbidden",
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::IntegrityCheckFailed => "Integrity check failed",
            ErrorCode::ChallengeExpired => "Agreement challenge has expired",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::TermsNotFound => "No terms have been published yet",
            ErrorCode::VersionNotFound => "Terms version not found",
            ErrorCode::StorageFailure => "Storage operation failed",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Result type used throughout the HTTP layer.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// Create an Unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create a Forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Create a ValidationFailed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a TermsNotFound error (empty store).
    pub fn no_terms() -> Self {
        Self::from_code(ErrorCode::TermsNotFound)
    }

    /// Create a VersionNotFound error.
    pub fn version_not_found(version: TermsVersion) -> Self {
        Self::new(
            ErrorCode::VersionNotFound,
            format!("Terms version {} not found", version),
        )
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::VersionNotFound { version } => ApiError::version_not_found(version),
            StorageError::LockPoisoned | StorageError::Backend { .. } => {
                ApiError::new(ErrorCode::StorageFailure, err.to_string())
            }
        }
    }
}

impl From<ChallengeError> for ApiError {
    fn from(err: ChallengeError) -> Self {
        let code = match err {
            ChallengeError::Expired { .. } => ErrorCode::ChallengeExpired,
            ChallengeError::IntegrityMismatch | ChallengeError::MalformedTag { .. } => {
                ErrorCode::IntegrityCheckFailed
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal_error(err.to_string())
    }
}
