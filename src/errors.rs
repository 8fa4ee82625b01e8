use crate::{
    services::bootcamp_service::BootcampError,
    validation::{FieldViolation, summary, violations},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// A lightweight wrapper for request errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Per-field violations, present only for validation failures.
    pub details: Vec<FieldViolation>,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            details: Vec::new(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn with_details(mut self, details: Vec<FieldViolation>) -> Self {
        self.details = details;
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.message,
            "status": self.status.as_u16()
        });
        if !self.details.is_empty() {
            body["details"] = json!(self.details);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<BootcampError> for AppError {
    fn from(err: BootcampError) -> Self {
        match err {
            BootcampError::Validation(validation) => {
                AppError::bad_request(summary(&validation)).with_details(violations(&validation))
            }
            BootcampError::DuplicateName(name) => {
                AppError::bad_request(format!("Duplicate field value entered: name `{}`", name))
            }
            BootcampError::NotFound(id) => {
                AppError::not_found(format!("Bootcamp not found with id of {}", id))
            }
            other => {
                tracing::error!("bootcamp operation failed: {}", other);
                AppError::internal("Server Error")
            }
        }
    }
}
