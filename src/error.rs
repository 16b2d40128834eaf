//! Roster error types with HTTP status code mapping.
//!
//! [`RosterError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//!
//! Note that "not found" on delete/update-by-id is *not* an error for most
//! endpoints: those statements are silent no-ops when the id is absent.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1003,
///     "message": "no active students found"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 2000–2999 | Not Found  | 404 Not Found             |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Batch add received neither `students` nor `names`, or an empty list.
    #[error("no students provided")]
    NoStudentsProvided,

    /// Spin found no student whose status is `present` (or unset).
    #[error("no active students found")]
    NoActiveStudents,

    /// Spin mode is not one of `random`, `rollCall` or `fair`.
    #[error("unknown selection mode: {0}")]
    UnknownMode(String),

    /// Student with the given id was not found.
    #[error("student not found: {0}")]
    StudentNotFound(i64),

    /// Database failure.
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RosterError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::NoStudentsProvided => 1002,
            Self::NoActiveStudents => 1003,
            Self::UnknownMode(_) => 1004,
            Self::StudentNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::NoStudentsProvided
            | Self::NoActiveStudents
            | Self::UnknownMode(_) => StatusCode::BAD_REQUEST,
            Self::StudentNotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
