//! API error types and their HTTP rendering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use confeti_processor::error::{LookupError, ProcessorError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Short error family label
    pub error: String,
    /// Human-readable message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Aggregation or reduction failed
    #[error(transparent)]
    Processor(#[from] ProcessorError),

    /// The request was rejected before reaching the processor
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        ApiError::Processor(err.into())
    }
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Processor(err) => err.kind(),
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

/// Every failure is reported as a client error carrying the triggering message
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Processor(ProcessorError::Consistency(_)) => {
                tracing::error!(error = %self, "Statistics request violated a consistency check")
            }
            _ => tracing::warn!(error = %self, "Statistics request failed"),
        }

        let body = ErrorResponse::new(self.kind(), self.to_string());
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
