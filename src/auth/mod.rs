//! Authentication and authorization module for Warden.
//!
//! This module provides the credential store, token generation, password
//! hashing, the policy engine, and the two-gate access pipeline.

pub mod password;
pub mod pipeline;
pub mod policy;
pub mod session;
pub mod store;
pub mod token;

pub use password::{hash_password, verify_password, HashParams, PasswordError};
pub use pipeline::{
    correlation_id, AccessError, AccessRequest, Action, AuthDecision, AuthPipeline, Outcome,
};
pub use policy::{PolicyEngine, PolicyError, ReloadMode};
pub use session::{check_credentials, issue_password_hash, issue_session_token, SessionError};
pub use store::CredentialStore;
pub use token::{generate_token, try_generate_token, TokenError, DEFAULT_TOKEN_LENGTH};
