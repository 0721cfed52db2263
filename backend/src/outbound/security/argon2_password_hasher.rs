//! Argon2id password hashing adapter.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};

use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Hashes credentials with Argon2id using the library defaults. Each hash
/// carries its own salt and parameters in PHC string format, so parameter
/// upgrades only affect new hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordHasherError::hash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordHasherError::invalid_hash(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHasherError::invalid_hash(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("correct horse battery").expect("hashes");
        assert!(hasher.verify("correct horse battery", &hash).expect("verifies"));
        assert!(!hasher.verify("wrong password", &hash).expect("verifies"));
    }

    #[test]
    fn garbage_hash_is_an_error_not_a_mismatch() {
        let hasher = Argon2PasswordHasher;
        let err = hasher.verify("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, PasswordHasherError::InvalidHash { .. }));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = Argon2PasswordHasher;
        let first = hasher.hash("same input").expect("hashes");
        let second = hasher.hash("same input").expect("hashes");
        assert_ne!(first, second);
    }
}
