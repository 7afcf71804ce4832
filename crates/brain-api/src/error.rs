//! API error types and JSON error response formatting.
//!
//! ApiError gives every endpoint the same `{error, message}` body and maps
//! the service's error kinds to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use brain_core::error::BrainError;
use serde::{Deserialize, Serialize};
use tracing::error;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "service_unavailable").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 422 Unprocessable Entity - request is well-formed but its values are not.
    #[error("{0}")]
    UnprocessableEntity(String),
    /// 500 Internal Server Error.
    #[error("{0}")]
    Internal(String),
    /// 503 Service Unavailable - the embedding model is not loaded.
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::UnprocessableEntity(_) => "unprocessable_entity",
            ApiError::Internal(_) => "internal_error",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<BrainError> for ApiError {
    fn from(err: BrainError) -> Self {
        match &err {
            BrainError::ServiceUnavailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            BrainError::Validation(_) | BrainError::Numeric(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<brain_chat::ChatError> for ApiError {
    fn from(err: brain_chat::ChatError) -> Self {
        BrainError::from(err).into()
    }
}
