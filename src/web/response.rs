//! JSON payload shared by every endpoint.
//!
//! Wire format: `code` is the decimal status code as a string, `status` is
//! the short status text for 200/401/403, and every other field is omitted
//! unless set. The body always ends with a newline.

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Response body.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    /// Decimal status code.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Issued password hash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// `OK`, `Forbidden` or `Unauthorized`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Issued session token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "build-date", skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,
}

/// Status text carried in the `status` field.
pub fn status_text(code: StatusCode) -> Option<&'static str> {
    match code {
        StatusCode::OK => Some("OK"),
        StatusCode::FORBIDDEN => Some("Forbidden"),
        StatusCode::UNAUTHORIZED => Some("Unauthorized"),
        _ => None,
    }
}

/// A status code plus payload, rendered as JSON with a trailing newline.
#[derive(Debug, Clone)]
pub struct JsonReply {
    status: StatusCode,
    payload: Payload,
}

impl JsonReply {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            payload: Payload::default(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.payload.data = Some(data.into());
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.payload.hash = Some(hash.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.payload.message = Some(message.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.payload.token = Some(token.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>, build_date: impl Into<String>) -> Self {
        self.payload.version = Some(version.into());
        self.payload.build_date = Some(build_date.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The payload as it will be written, with `code` and `status` filled in.
    pub fn payload(&self) -> Payload {
        let mut payload = self.payload.clone();
        payload.code = self.status.as_u16().to_string();
        payload.status = status_text(self.status).map(str::to_string);
        payload
    }

    /// Serialized body, newline included.
    pub fn body(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string(&self.payload())?;
        text.push('\n');
        Ok(text)
    }
}

impl IntoResponse for JsonReply {
    fn into_response(self) -> Response {
        match self.body() {
            Ok(body) => (self.status, [(CONTENT_TYPE, "application/json")], body).into_response(),
            Err(e) => {
                tracing::error!("Failed to encode response payload: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
