//! Test helpers for Web API integration tests.
//!
//! Builds the full router over a throwaway policy file and cheap Argon2
//! parameters.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderName;
use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tempfile::TempDir;

use warden::auth::{AuthPipeline, CredentialStore, HashParams, PolicyEngine, ReloadMode};
use warden::web::create_router;
use warden::web::handlers::AppState;

/// Header carrying the session token.
pub const TOKEN: HeaderName = HeaderName::from_static("token");

/// Low-cost hash parameters so tests stay fast.
pub const CHEAP_HASH: HashParams = HashParams {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

/// Default policy: `demo` may read `data`.
pub const DEMO_POLICY: &str = "p, demo, data, read\n";

/// Test application with a handle on its state and policy file.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub policy_path: PathBuf,
    _dir: TempDir,
}

/// Shipped model document.
pub fn model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/model.conf")
}

/// Create a test server with the given policy rows.
pub async fn create_test_app(policy_rows: &str, mode: ReloadMode) -> TestApp {
    create_test_app_with(policy_rows, mode, |state| state).await
}

/// Create a test server, letting the caller adjust the state first.
pub async fn create_test_app_with(
    policy_rows: &str,
    mode: ReloadMode,
    customize: impl FnOnce(AppState) -> AppState,
) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let policy_path = dir.path().join("policy.csv");
    std::fs::write(&policy_path, policy_rows).expect("Failed to write policy");

    let engine = PolicyEngine::load(model_path(), &policy_path, mode)
        .await
        .expect("Failed to load policy engine");
    let pipeline = AuthPipeline::new(Arc::new(CredentialStore::new()), Arc::new(engine));
    let state = Arc::new(customize(
        AppState::new(Arc::new(pipeline)).with_hash_params(CHEAP_HASH),
    ));

    let server = TestServer::new(create_router(state.clone())).expect("Failed to create test server");

    TestApp {
        server,
        state,
        policy_path,
        _dir: dir,
    }
}

/// `Authorization` header value for HTTP Basic credentials.
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Store a password hash for `username`.
pub async fn generate_hash(server: &TestServer, username: &str, password: &str) -> Value {
    let response = server
        .get("/generate")
        .add_header(AUTHORIZATION, basic_auth(username, password))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

/// Register `username` and return a fresh session token.
pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    generate_hash(server, username, password).await;

    let response = server
        .get("/auth")
        .add_header(AUTHORIZATION, basic_auth(username, password))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["token"]
        .as_str()
        .expect("token missing from response")
        .to_string()
}
