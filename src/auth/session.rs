//! Credential lifecycle: password-hash issuance and session-token issuance.

use thiserror::Error;
use tracing::{info, warn};

use super::password::{hash_password, verify_password, HashParams, PasswordError};
use super::store::CredentialStore;
use super::token::{try_generate_token, TokenError};

/// Session-related errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Unknown username or wrong password. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No entropy available for the new token.
    #[error("token generation failed: {0}")]
    RandomSource(#[from] TokenError),
}

/// Hash `password` and store it for `username`, replacing any previous hash.
///
/// Anyone may call this for any username. That is a demo convenience, not a
/// registration policy.
pub fn issue_password_hash(
    store: &CredentialStore,
    username: &str,
    password: &str,
    params: &HashParams,
) -> Result<String, PasswordError> {
    let hashed = hash_password(password, params)?;
    store.set_password(username, hashed.clone());
    info!(user = username, "Stored password hash for user");
    Ok(hashed)
}

/// Check `username`/`password` against the stored hash.
pub fn check_credentials(store: &CredentialStore, username: &str, password: &str) -> bool {
    let Some(stored) = store.password(username) else {
        info!(username, "Invalid username");
        return false;
    };

    match verify_password(password, &stored) {
        Ok(()) => {
            info!(username, "Valid username and password");
            true
        }
        Err(PasswordError::InvalidHash) => {
            warn!(username, "Stored password hash is unreadable");
            false
        }
        Err(_) => {
            info!(username, "Invalid password");
            false
        }
    }
}

/// Verify the credentials, then issue and store a fresh session token.
///
/// Nothing is written to the store unless verification and token generation
/// both succeed.
pub fn issue_session_token(
    store: &CredentialStore,
    username: &str,
    password: &str,
    token_length: usize,
) -> Result<String, SessionError> {
    if !check_credentials(store, username, password) {
        return Err(SessionError::InvalidCredentials);
    }

    let token = try_generate_token(token_length)?;
    store.set_token(username, token.clone());
    info!(user = username, "Authentication granted");
    Ok(token)
}
