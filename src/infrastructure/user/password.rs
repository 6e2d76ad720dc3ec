//! Password hashing with Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// One-way password hashing
pub trait PasswordHasher: Send + Sync + Debug {
    /// Produce a salted, self-describing hash of `password`
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Whether `password` matches `hash`; malformed hashes never match
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with the crate's default parameters
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_differs_from_plaintext() {
        let hasher = Argon2Hasher::new();

        let hash = hasher.hash("Password1234").unwrap();

        assert_ne!(hash, "Password1234");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("Password1234").unwrap();

        assert!(hasher.verify("Password1234", &hash));
        assert!(!hasher.verify("Password12345", &hash));
        assert!(!hasher.verify("password1234", &hash));
    }

    #[test]
    fn test_salted() {
        let hasher = Argon2Hasher::new();

        let first = hasher.hash("Password1234").unwrap();
        let second = hasher.hash("Password1234").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("Password1234", &first));
        assert!(hasher.verify("Password1234", &second));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("Password1234", "Password1234"));
        assert!(!hasher.verify("", ""));
    }
}
