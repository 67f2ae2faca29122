//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::response::JsonReply;

/// API error type.
///
/// Rendered through the same payload as successful replies, so a rejection
/// carries only the code, the status text and an optional message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: Option<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(message.into()))
    }

    /// Authorization failure (401).
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, None)
    }

    /// Authentication failure (403).
    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, None)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, Some(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let reply = JsonReply::new(self.status);
        match self.message {
            Some(message) => reply.with_message(message).into_response(),
            None => reply.into_response(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.status, message),
            None => write!(f, "{}", self.status),
        }
    }
}

impl std::error::Error for ApiError {}
