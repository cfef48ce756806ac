pub mod codes;
pub mod handlers;
pub mod messages;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use validator::ValidationErrors;

/// Uniform error payload returned for every failed request.
///
/// ```json
/// {
///   "status": 404,
///   "message": "Category not found with ID 7",
///   "path": "/api/categories/7",
///   "timestamp": "2024-05-01T12:00:00.000Z"
/// }
/// ```
///
/// `path` is empty when the response is built and is filled in by
/// [`handlers::error_envelope`], which sees the original request URI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Numeric HTTP status
    pub status: u16,
    /// Human-readable error message
    pub message: String,
    /// Request path that produced the error
    pub path: String,
    /// RFC 3339 UTC instant the error was produced
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            path: String::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.clone())).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Method Not Allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The payload carries internal detail for logs only; clients see a generic message.
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            // A well-formed body of the wrong shape is still a bad request
            AppError::JsonExtractorRejection(JsonRejection::JsonDataError(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::ValidationError(_)
            | AppError::InvalidId(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::JsonExtractorRejection(_) => ErrorCode::JsonExtraction,
            AppError::ValidationError(_) => ErrorCode::ValidationError,
            AppError::InvalidId(_) => ErrorCode::InvalidId,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::MethodNotAllowed(_) => ErrorCode::MethodNotAllowed,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
        }
    }

    /// Message shown to the client.
    pub fn client_message(&self) -> String {
        match self {
            AppError::JsonExtractorRejection(e) => e.body_text(),
            AppError::ValidationError(e) => validation_message(e),
            AppError::InternalServerError(_) => messages::INTERNAL_ERROR.to_string(),
            AppError::InvalidId(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::Conflict(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        match &self {
            AppError::InternalServerError(detail) => {
                tracing::error!(error_code = code.code(), "Internal server error: {}", detail);
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = code.code(), "Validation error: {:?}", e);
            }
            AppError::Unauthorized(msg) | AppError::Forbidden(msg) => {
                tracing::info!(error_code = code.code(), "Access rejected: {}", msg);
            }
            other => {
                tracing::info!(error_code = code.code(), "{}", other);
            }
        }

        ErrorResponse::new(self.status(), self.client_message()).into_response()
    }
}

/// Flattens field violations into `field: message` pairs, fields sorted, joined by `, `.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let by_field: BTreeMap<_, _> = errors.field_errors().into_iter().collect();

    by_field
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_deref()
                    .unwrap_or_else(|| err.code.as_ref());
                format!("{}: {}", field, message)
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
