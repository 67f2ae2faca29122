//! Per-request deadline.

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::web::error::ApiError;

/// Message carried by a timed-out request.
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Middleware answering 408 when the inner service misses the deadline.
pub async fn request_deadline(
    State(deadline): State<Duration>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let uri = request.uri().clone();
    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%uri, ?deadline, "Request deadline exceeded");
            ApiError::new(StatusCode::REQUEST_TIMEOUT, Some(TIMEOUT_MESSAGE.to_string()))
                .into_response()
        }
    }
}
