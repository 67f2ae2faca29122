//! Error types for Warden.

use thiserror::Error;

use crate::auth::{PasswordError, PolicyError, SessionError};

/// Common error type for Warden.
#[derive(Error, Debug)]
pub enum WardenError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Policy engine could not be built or reloaded.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Password hashing or verification failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Session token issuance failed.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// Result type alias for Warden operations.
pub type Result<T> = std::result::Result<T, WardenError>;
