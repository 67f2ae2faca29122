//! Gated resource and counter handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use tracing::{debug, error};

use super::AppState;
use crate::auth::correlation_id;
use crate::web::error::ApiError;
use crate::web::response::JsonReply;

/// Body returned once both access gates have passed.
pub const RESOURCE_DATA: &str = "Here is some data you have access to";

/// Key incremented by `/counter`.
pub const COUNTER_KEY: &str = "foo";

/// `/{resource}/{name}` - only reached through the access gate.
pub async fn resource(Path((resource, name)): Path<(String, String)>) -> JsonReply {
    debug!(%resource, %name, "Serving resource");
    JsonReply::ok().with_data(RESOURCE_DATA)
}

/// `/counter` - increment the shared counter and report the new value.
pub async fn counter(State(state): State<Arc<AppState>>) -> Result<JsonReply, ApiError> {
    let started = Instant::now();
    let id = correlation_id();

    let value = state.counter.incr(COUNTER_KEY).map_err(|e| {
        error!(uuid = %id, error = %e, "Error incrementing counter");
        ApiError::internal("Error incrementing counter")
    })?;

    debug!(uuid = %id, elapsed = ?started.elapsed(), value, "Counter handled");
    Ok(JsonReply::ok().with_data(format!("The counter is {value}")))
}
