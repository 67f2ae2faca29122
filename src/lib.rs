//! Warden - access gatekeeper for an HTTP resource server.
//!
//! Every resource request passes an authentication gate (session token)
//! and then an authorization gate (Casbin policy).

pub mod auth;
pub mod config;
pub mod counter;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    check_credentials, hash_password, issue_password_hash, issue_session_token, verify_password,
    AccessError, AccessRequest, Action, AuthDecision, AuthPipeline, CredentialStore, HashParams,
    Outcome, PasswordError, PolicyEngine, PolicyError, ReloadMode, SessionError,
};
pub use config::Config;
pub use counter::{Counter, CounterError, MemoryCounter};
pub use error::{Result, WardenError};
