use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use perra_core::error::{self, ApiError};

use crate::counters::CounterError;
use crate::uploads::UploadError;

/// Internal error type that converts to structured API responses
#[derive(Debug)]
pub enum AppError {
    /// Validation error (400)
    Validation {
        message: String,
        field: Option<String>,
        docs_hint: Option<String>,
    },
    /// Resource not found (404)
    NotFound { resource: String },
    /// Request body over the configured limit (413)
    PayloadTooLarge(String),
    /// Counter or upload storage failed (500)
    Storage(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: error::codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    request_id,
                    docs_hint,
                },
            ),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                ApiError {
                    error: error::codes::NOT_FOUND.to_string(),
                    message: format!("{resource} not found"),
                    field: None,
                    request_id,
                    docs_hint: None,
                },
            ),
            AppError::PayloadTooLarge(message) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiError {
                    error: error::codes::PAYLOAD_TOO_LARGE.to_string(),
                    message,
                    field: Some("body".to_string()),
                    request_id,
                    docs_hint: Some("Check PERRA_MAX_UPLOAD_BYTES on the server.".to_string()),
                },
            ),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    internal_error(request_id),
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}

fn internal_error(request_id: String) -> ApiError {
    ApiError {
        error: error::codes::INTERNAL_ERROR.to_string(),
        message: "An internal error occurred".to_string(),
        field: None,
        request_id,
        docs_hint: None,
    }
}

impl From<CounterError> for AppError {
    fn from(err: CounterError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Storage(err.to_string())
    }
}
