//! Password hashing utilities using Argon2id

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use std::fmt::Debug;

use crate::domain::AuthError;
use crate::infrastructure::crypto::constant_time_eq;

const SALT_BYTES: usize = 16;
const KEY_LENGTH: usize = 64;

// OWASP 2024 recommended parameters: m=19456 KiB, t=2, p=1
const MEMORY_KIB: u32 = 19_456;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password into a storable string
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash.
    ///
    /// A malformed stored value is a mismatch, never an error.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Argon2id-based hasher producing `salt:derivedKeyHex` values
///
/// Each call to [`PasswordHasher::hash`] draws a fresh 16-byte salt, so
/// hashing the same password twice yields different outputs.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a new hasher
    pub fn new() -> Self {
        Self
    }

    /// Derive a fixed-length key from a password and salt
    fn derive(&self, password: &str, salt: &str) -> Result<Vec<u8>, AuthError> {
        let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, Some(KEY_LENGTH))
            .map_err(|e| AuthError::internal(format!("Invalid derivation parameters: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = vec![0u8; KEY_LENGTH];
        argon2
            .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut key)
            .map_err(|e| AuthError::internal(format!("Key derivation failed: {e}")))?;

        Ok(key)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt_bytes = [0u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);

        let key = self.derive(password, &salt)?;

        Ok(format!("{salt}:{}", hex::encode(key)))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((salt, key_hex)) = stored.split_once(':') else {
            return false;
        };

        if salt.is_empty() || key_hex.is_empty() {
            return false;
        }

        let Ok(stored_key) = hex::decode(key_hex) else {
            return false;
        };

        let Ok(derived) = self.derive(password, salt) else {
            return false;
        };

        constant_time_eq(&stored_key, &derived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_hash_shape() {
        let hasher = Argon2Hasher::new();

        let hash = hasher.hash("some_password").unwrap();
        let (salt, key) = hash.split_once(':').unwrap();

        // 16 salt bytes and a 64-byte key, both hex-encoded
        assert_eq!(salt.len(), SALT_BYTES * 2);
        assert_eq!(key.len(), KEY_LENGTH * 2);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_is_unique() {
        let hasher = Argon2Hasher::new();
        let password = "same_password";

        let hash1 = hasher.hash(password).unwrap();
        let hash2 = hasher.hash(password).unwrap();

        // Different salts, different outputs
        assert_ne!(hash1, hash2);

        assert!(hasher.verify(password, &hash1));
        assert!(hasher.verify(password, &hash2));
    }

    #[test]
    fn test_verify_malformed_stored_value() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("password", ""));
        assert!(!hasher.verify("password", "no-separator"));
        assert!(!hasher.verify("password", ":missing-salt"));
        assert!(!hasher.verify("password", "missing-key:"));
        assert!(!hasher.verify("password", "salt:not-hex-at-all"));
    }

    #[test]
    fn test_verify_truncated_key_fails() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("password").unwrap();

        let truncated = &hash[..hash.len() - 2];
        assert!(!hasher.verify("password", truncated));
    }

    #[test]
    fn test_empty_password() {
        let hasher = Argon2Hasher::new();

        let hash = hasher.hash("").unwrap();
        assert!(hasher.verify("", &hash));
        assert!(!hasher.verify("non-empty", &hash));
    }
}
