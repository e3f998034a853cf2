//! Structured error handling for the HTTP surface.
//!
//! Provides type-safe error handling with automatic conversion to HTTP
//! responses. Storage details are logged but never exposed to clients.

use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::validation::{FieldViolation, ValidationError};

/// Application error type with automatic response conversion.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage: {0}")]
    Storage(String),
}

impl AppError {
    /// Create a not found error for an entity.
    pub fn not_found(entity: &str, id: impl Display) -> Self {
        Self::NotFound(format!("{entity} with ID {id} not found"))
    }

    /// Create a conflict error for a duplicate unique field.
    #[must_use]
    pub fn conflict(field: &str) -> Self {
        let mut field = field.to_string();
        if let Some(first) = field.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self::Conflict(format!("{field} already exists"))
    }

    /// HTTP status code for this error kind.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<FieldViolation>>,
}

impl From<&AppError> for ErrorBody {
    fn from(error: &AppError) -> Self {
        let status = error.status_code();
        let (message, violations) = match error {
            AppError::Validation(err) => (err.to_string(), Some(err.violations().to_vec())),
            AppError::NotFound(msg) | AppError::Conflict(msg) => (msg.clone(), None),
            AppError::Storage(_) => ("Internal server error".to_string(), None),
        };
        Self {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error"),
            message,
            violations,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Storage(msg) = &self {
            error!(error = %msg, "Storage error");
        }
        let body = ErrorBody::from(&self);
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for contact operations.
pub type AppResult<T> = Result<T, AppError>;
