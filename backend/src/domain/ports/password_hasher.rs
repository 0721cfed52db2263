//! Port abstraction for password hashing.

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed (salt generation or parameter error).
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        InvalidHash { message: String } => "stored password hash invalid: {message}",
    }
}

/// Hashing is CPU-bound; adapters run it on a blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Whether `password` matches `hash`. Malformed hashes are an error,
    /// not a mismatch.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError>;
}
