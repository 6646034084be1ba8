//! Failure classification for the per-request path.
//!
//! Every failure escaping a pipeline stage maps to an HTTP-style status code
//! and a stable JSON envelope (`{"error": {"code", "message"}}`) so callers
//! can branch on `code` without parsing prose.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failure raised by one of the three pipeline stages.
///
/// The variant is the classification: precondition violations are 400, inputs
/// that arrived but make no sense are 422, and everything else (load,
/// predict, serialize faults) is 500. The message carries the human-readable
/// detail and nothing of the service's internals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// A request-level precondition was violated.
    #[error("{0}")]
    InvalidRequest(String),

    /// The input was malformed or semantically invalid.
    #[error("{0}")]
    UnprocessableInput(String),

    /// Model loading, prediction, or serialization failed.
    #[error("{0}")]
    Internal(String),
}

impl InferenceError {
    /// Pure, total status mapping. Invoked once per failed request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            InferenceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            InferenceError::UnprocessableInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            InferenceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire shape of a failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorEnvelope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorEnvelope {
                code: code.as_u16(),
                message: message.into(),
            },
        }
    }
}

impl From<&InferenceError> for ErrorBody {
    fn from(err: &InferenceError) -> Self {
        ErrorBody::new(err.status_code(), err.to_string())
    }
}

impl IntoResponse for InferenceError {
    fn into_response(self) -> Response {
        let body = ErrorBody::from(&self);
        (self.status_code(), Json(body)).into_response()
    }
}
