//! Web error types for the portal server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::data::{StoreError, SubmissionForm, ValidationError};

/// Error type for web API operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request with validation error.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Submitted form is missing required fields or has bad values.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A valid submission could not be saved.
    ///
    /// Carries the form back so the page can offer a retry.
    #[error("{message}")]
    Persistence {
        message: String,
        details: String,
        submitted: Box<SubmissionForm>,
    },

    /// Storage failure on the admin path.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing_fields: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    invalid_fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted: Option<Box<SubmissionForm>>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error: error.into(),
            details,
            missing_fields: Vec::new(),
            invalid_fields: Vec::new(),
            submitted: None,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            WebError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Not Found", Some(msg)),
            ),
            WebError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Bad Request", Some(msg)),
            ),
            WebError::Validation(err) => {
                let mut body = ErrorResponse::new(err.to_string(), None);
                body.missing_fields = err.missing;
                body.invalid_fields = err.invalid;
                (StatusCode::BAD_REQUEST, body)
            }
            WebError::Persistence {
                message,
                details,
                submitted,
            } => {
                tracing::error!(details = %details, "Failed to persist submission");
                let mut body = ErrorResponse::new(message, Some(details));
                body.submitted = Some(submitted);
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            WebError::Store(StoreError::Position(e)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Bad Request", Some(e.to_string())),
            ),
            WebError::Store(e @ StoreError::CorruptTable { .. }) => {
                tracing::error!("Submission table is unreadable: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Corrupt Submission Table", Some(e.to_string())),
                )
            }
            WebError::Store(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Storage Error", None),
                )
            }
            WebError::Internal(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal Server Error", None),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
