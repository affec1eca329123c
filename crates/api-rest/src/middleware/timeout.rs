//! Timeout middleware
//!
//! The wrapped handler future is dropped when the limit expires, which
//! cancels the lookup stream and any in-flight group reductions with it.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;

use crate::error::ErrorResponse;

/// Per-request time limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeout(pub Duration);

impl Default for RequestTimeout {
    fn default() -> Self {
        Self(Duration::from_secs(30))
    }
}

/// Fail requests that exceed the configured limit with 504
pub async fn timeout_middleware(
    State(RequestTimeout(timeout)): State<RequestTimeout>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!("Request timed out after {:?}", timeout);
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ErrorResponse::new("timeout", "Request timed out")),
            )
                .into_response()
        }
    }
}
