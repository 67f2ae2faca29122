//! In-memory credential store.
//!
//! Holds the hashed password and the active session token per principal.
//! Entries live for the process lifetime and are only ever overwritten.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Principal-keyed password hashes and session tokens.
///
/// Both maps sit behind a reader/writer lock, so readers never observe a
/// partially written entry and writers to different principals don't clobber
/// each other.
#[derive(Debug, Default)]
pub struct CredentialStore {
    passwords: RwLock<HashMap<String, String>>,
    tokens: RwLock<HashMap<String, String>>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the password hash for a principal, replacing any previous one.
    pub fn set_password(&self, principal: &str, hashed: impl Into<String>) {
        self.passwords
            .write()
            .insert(principal.to_string(), hashed.into());
    }

    /// Stored password hash for a principal.
    pub fn password(&self, principal: &str) -> Option<String> {
        self.passwords.read().get(principal).cloned()
    }

    /// Whether a password hash has been stored for the principal.
    pub fn has_password(&self, principal: &str) -> bool {
        self.passwords.read().contains_key(principal)
    }

    /// Store the session token for a principal, replacing any previous one.
    pub fn set_token(&self, principal: &str, token: impl Into<String>) {
        self.tokens.write().insert(principal.to_string(), token.into());
    }

    /// Active session token for a principal.
    pub fn token(&self, principal: &str) -> Option<String> {
        self.tokens.read().get(principal).cloned()
    }

    /// Whether a session token has been issued for the principal.
    pub fn has_token(&self, principal: &str) -> bool {
        self.tokens.read().contains_key(principal)
    }

    /// Number of principals with an active token.
    pub fn token_count(&self) -> usize {
        self.tokens.read().len()
    }
}
