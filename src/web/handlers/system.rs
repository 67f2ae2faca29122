//! Version and health handlers.

use crate::web::response::JsonReply;

/// Crate version reported by `/version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date, stamped at compile time through `WARDEN_BUILD_DATE`.
pub const BUILD_DATE: &str = match option_env!("WARDEN_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

/// `/version` - build metadata.
pub async fn version() -> JsonReply {
    JsonReply::ok().with_version(VERSION, BUILD_DATE)
}

/// Health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}
