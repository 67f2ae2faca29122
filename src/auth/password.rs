//! Password hashing and verification for Warden.
//!
//! Uses Argon2id for secure password hashing.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use serde::Deserialize;
use thiserror::Error;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Password hash is invalid.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password verification failed (wrong password).
    #[error("password verification failed")]
    VerificationFailed,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HashParams {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Time cost (iterations).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Parallelism (lanes).
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    65536 // 64 MB
}

fn default_iterations() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    4
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn create_argon2(params: &HashParams) -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Hash a password using Argon2id.
///
/// Returns a PHC-formatted hash string that includes the salt and parameters.
/// A fresh salt is drawn for every call, so hashing the same password twice
/// yields two different strings of the same length.
///
/// # Examples
///
/// ```
/// use warden::auth::{hash_password, HashParams};
///
/// let params = HashParams { memory_kib: 1024, iterations: 1, parallelism: 1 };
/// let hash = hash_password("my_secure_password", &params).unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str, params: &HashParams) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = create_argon2(params)?;
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Returns `Ok(())` if the password matches, or an error if it doesn't.
///
/// # Examples
///
/// ```
/// use warden::auth::{hash_password, verify_password, HashParams};
///
/// let params = HashParams { memory_kib: 1024, iterations: 1, parallelism: 1 };
/// let hash = hash_password("my_secure_password", &params).unwrap();
/// assert!(verify_password("my_secure_password", &hash).is_ok());
/// assert!(verify_password("wrong_password", &hash).is_err());
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    // Cost and salt come from the parsed hash, not from the configured params
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> HashParams {
        HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_password_success() {
        let hash = hash_password("test_password_123", &cheap()).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$")); // Version 0x13 = 19
    }

    #[test]
    fn test_hash_password_different_hashes() {
        let hash1 = hash_password("same_password", &cheap()).unwrap();
        let hash2 = hash_password("same_password", &cheap()).unwrap();

        assert_ne!(hash1, hash2);
        assert_eq!(hash1.len(), hash2.len());
    }

    #[test]
    fn test_hash_length_is_fixed() {
        let short = hash_password("t", &cheap()).unwrap();
        let long = hash_password(&"x".repeat(200), &cheap()).unwrap();
        assert_eq!(short.len(), long.len());
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("test", &cheap()).unwrap();
        assert!(verify_password("test", &hash).is_ok());
    }

    #[test]
    fn test_verify_password_wrong() {
        let hash = hash_password("correct_password", &cheap()).unwrap();

        let result = verify_password("wrong_password", &hash);
        assert!(matches!(result, Err(PasswordError::VerificationFailed)));
    }

    #[test]
    fn test_round_trip_for_several_passwords() {
        let passwords = ["", "test", "パスワード123", "p@$$w0rd!#$%^&*()", "  spaced  "];
        for p in passwords {
            let hash = hash_password(p, &cheap()).unwrap();
            assert!(verify_password(p, &hash).is_ok(), "{p:?} should verify");
            for other in passwords.iter().filter(|o| **o != p) {
                assert!(verify_password(other, &hash).is_err());
            }
        }
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("any_password", "not_a_valid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[test]
    fn test_invalid_params_surface_hash_error() {
        let params = HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        let result = hash_password("test", &params);
        assert!(matches!(result, Err(PasswordError::HashError(_))));
    }

    #[test]
    fn test_argon2_params_embedded() {
        let hash = hash_password("test_password", &cheap()).unwrap();

        assert!(hash.contains("m=1024"));
        assert!(hash.contains("t=1"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_default_params() {
        let params = HashParams::default();
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 4);
    }

    #[test]
    fn test_password_error_display() {
        assert_eq!(
            PasswordError::VerificationFailed.to_string(),
            "password verification failed"
        );
        assert_eq!(
            PasswordError::InvalidHash.to_string(),
            "invalid password hash format"
        );
    }
}
