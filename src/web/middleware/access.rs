//! Access gate middleware for `/{resource}/{name}`.
//!
//! Runs the authentication gate, then the authorization gate, before the
//! resource handler sees the request.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::auth::{correlation_id, AccessRequest, Action, Outcome};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "token";

/// Error a rejected request receives, or `None` when it may proceed.
pub fn rejection(outcome: Outcome) -> Option<ApiError> {
    match outcome {
        Outcome::Authorized => None,
        Outcome::NotAuthorized => Some(ApiError::unauthorized()),
        Outcome::Authenticated | Outcome::NotAuthenticated => Some(ApiError::forbidden()),
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Middleware enforcing both access gates.
pub async fn access_gate(
    State(state): State<Arc<AppState>>,
    Path((resource, name)): Path<(String, String)>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let id = correlation_id();
    info!(uuid = %id, uri = %request.uri(), method = %request.method(), "Request");

    let access = AccessRequest {
        name,
        resource,
        action: Action::from_method(request.method().as_str()),
        token: session_token(request.headers()),
    };

    let decision = state.pipeline.evaluate_with_id(id, &access).await;
    match rejection(decision.outcome) {
        None => next.run(request).await,
        Some(err) => err.into_response(),
    }
}
