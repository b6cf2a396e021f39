//! Axum-specific error types and mappings.
//!
//! Maps core client errors to HTTP status codes and a JSON error body.
//! Pipeline-internal failures never reach this module: the fallback ladder
//! converts them into degraded responses before the handler returns.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use gantry_core::services::pipeline::ClientError;
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
    timestamp: DateTime<Utc>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
            timestamp: Utc::now(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ClientError> for HttpError {
    fn from(err: ClientError) -> Self {
        HttpError::BadRequest(err.to_string())
    }
}
