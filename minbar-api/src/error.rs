//! Error types for minbar-api
//!
//! Maps the service error taxonomy onto HTTP statuses: validation failures
//! are 4xx and fail fast before side effects; upstream and storage
//! failures are caught at the boundary and mapped to generic 5xx bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::payments::PaymentError;
use crate::services::uploads::UploadError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Every audio candidate unreachable (503, bilingual body)
    #[error("No reachable audio source")]
    AllSourcesUnreachable,

    /// Payment processor or other upstream failure (502)
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Filesystem write failure (500)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// minbar-common error
    #[error("Common error: {0}")]
    Common(#[from] minbar_common::Error),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Validation(msg) => ApiError::BadRequest(msg),
            UploadError::Storage(e) => ApiError::Storage(e.to_string()),
            UploadError::Database(e) => ApiError::Common(e),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::UnknownPlan { currency, plan } => ApiError::BadRequest(format!(
                "unknown plan {:?} for currency {:?}",
                plan, currency
            )),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The bilingual 503 keeps its dedicated body shape
        if matches!(self, ApiError::AllSourcesUnreachable) {
            let body = Json(json!({
                "error": {
                    "code": "ALL_SOURCES_UNREACHABLE",
                    "message": "Audio recitation is temporarily unavailable",
                    "message_ar": "عذراً، التلاوة الصوتية غير متوفرة حالياً",
                }
            }));
            return (StatusCode::SERVICE_UNAVAILABLE, body).into_response();
        }

        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", msg),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            ApiError::Common(minbar_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            ApiError::Common(minbar_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
            ApiError::AllSourcesUnreachable => unreachable!("handled above"),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
