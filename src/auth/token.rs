//! Opaque session token generation.

use rand_core::{OsRng, RngCore};
use thiserror::Error;
use tracing::error;

/// Default number of random bytes in a session token (40 hex characters).
pub const DEFAULT_TOKEN_LENGTH: usize = 20;

/// Token generation errors.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The OS random source could not provide entropy.
    #[error("random source failure: {0}")]
    RandomSource(String),
}

/// Generate `length` random bytes and hex-encode them.
///
/// The result is always exactly `2 * length` lowercase hex characters.
pub fn try_generate_token(length: usize) -> Result<String, TokenError> {
    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TokenError::RandomSource(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Fail-closed variant of [`try_generate_token`].
///
/// Returns an empty string when the random source fails. An empty token never
/// matches a stored one, so callers that skip the error still deny access.
pub fn generate_token(length: usize) -> String {
    match try_generate_token(length) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate secure token");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_length_is_twice_byte_length() {
        for length in [1, 16, DEFAULT_TOKEN_LENGTH, 64] {
            let token = generate_token(length);
            assert_eq!(token.len(), length * 2);
        }
    }

    #[test]
    fn test_token_is_lowercase_hex() {
        let token = generate_token(DEFAULT_TOKEN_LENGTH);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(hex::decode(&token).unwrap().len(), DEFAULT_TOKEN_LENGTH);
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let token = try_generate_token(16).unwrap();
            assert_eq!(token.len(), 32);
            assert!(seen.insert(token), "token repeated");
        }
    }

    #[test]
    fn test_zero_length_token_is_empty() {
        assert_eq!(generate_token(0), "");
    }
}
