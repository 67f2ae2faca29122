//! Router configuration for Web API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{authenticate, counter, generate_hash, health_check, resource, version, AppState};
use super::middleware::{access_gate, request_deadline};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Resource routes (both access gates required)
    let gated_routes = Router::new()
        .route("/:resource/:name", get(resource).post(resource))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            access_gate,
        ));

    Router::new()
        .route("/generate", any(generate_hash))
        .route("/auth", get(authenticate))
        .route("/counter", any(counter))
        .route("/version", any(version))
        .merge(gated_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Full application: API routes, health check and the request deadline.
pub fn create_app(app_state: Arc<AppState>, request_timeout: Duration) -> Router {
    create_router(app_state)
        .merge(create_health_router())
        .layer(middleware::from_fn_with_state(
            request_timeout,
            request_deadline,
        ))
}
