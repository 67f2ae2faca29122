//! Credential lifecycle handlers.
//!
//! Both endpoints read HTTP Basic credentials. Argon2 runs on the blocking
//! pool so a slow hash never stalls the request workers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{Method, Uri},
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use tracing::{debug, error, info};

use super::AppState;
use crate::auth::{correlation_id, issue_password_hash, issue_session_token, SessionError};
use crate::web::error::ApiError;
use crate::web::response::JsonReply;

/// `/generate` - hash the Basic-auth password and store it for the user.
///
/// Replaces any hash already stored for that user.
pub async fn generate_hash(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    credentials: Option<TypedHeader<Authorization<Basic>>>,
) -> Result<JsonReply, ApiError> {
    let started = Instant::now();
    let id = correlation_id();
    info!(uuid = %id, %uri, %method, "Generate hash request");

    let Some(TypedHeader(Authorization(basic))) = credentials else {
        info!(uuid = %id, "No credentials provided");
        return Err(ApiError::bad_request("No credentials provided"));
    };

    let username = basic.username().to_string();
    let password = basic.password().to_string();
    let store = Arc::clone(state.store());
    let params = state.hash_params;

    let hash = tokio::task::spawn_blocking(move || {
        issue_password_hash(&store, &username, &password, &params)
    })
    .await
    .map_err(|e| {
        error!(uuid = %id, error = %e, "Hash task failed");
        ApiError::internal("Failed to hash password")
    })?
    .map_err(|e| {
        error!(uuid = %id, error = %e, "Error hashing password");
        ApiError::internal("Failed to hash password")
    })?;

    debug!(uuid = %id, elapsed = ?started.elapsed(), "Generate hash handled");
    Ok(JsonReply::ok().with_hash(hash))
}

/// `GET /auth` - verify Basic-auth credentials and issue a session token.
///
/// The new token replaces any previous one for the user.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    credentials: Option<TypedHeader<Authorization<Basic>>>,
) -> Result<JsonReply, ApiError> {
    let started = Instant::now();
    let id = correlation_id();
    info!(uuid = %id, %uri, %method, "Authenticate request");

    let Some(TypedHeader(Authorization(basic))) = credentials else {
        info!(uuid = %id, "No credentials provided");
        return Err(ApiError::unauthorized());
    };

    let username = basic.username().to_string();
    let password = basic.password().to_string();
    let store = Arc::clone(state.store());
    let token_length = state.token_length;

    let issued = tokio::task::spawn_blocking(move || {
        issue_session_token(&store, &username, &password, token_length)
    })
    .await
    .map_err(|e| {
        error!(uuid = %id, error = %e, "Authentication task failed");
        ApiError::internal("Failed to issue token")
    })?;

    let token = match issued {
        Ok(token) => token,
        Err(SessionError::InvalidCredentials) => return Err(ApiError::unauthorized()),
        Err(e) => {
            error!(uuid = %id, error = %e, "Error issuing token");
            return Err(ApiError::internal("Failed to issue token"));
        }
    };

    debug!(uuid = %id, elapsed = ?started.elapsed(), "Authenticate handled");
    Ok(JsonReply::ok().with_token(token))
}
