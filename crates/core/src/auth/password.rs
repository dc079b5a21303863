//! Argon2id password hashing.
//!
//! Demo users are seeded with a configured plain-text password. It is hashed
//! once per run and never written to the database in clear text.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur while hashing or checking a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The password was empty.
    #[error("password must not be empty")]
    Empty,

    /// Argon2 rejected the input.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// The stored value is not a PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Hashes `password` into a PHC string with a fresh random salt.
///
/// ```
/// use cmis_core::auth::hash_password;
///
/// let hash = hash_password("password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Checks `password` against a stored PHC hash.
///
/// Returns `Ok(false)` on a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e.to_string())),
    }
}

/// Returns true if `value` parses as a PHC hash string.
///
/// Used by the user seeder to leave already-hashed credentials alone.
#[must_use]
pub fn is_password_hash(value: &str) -> bool {
    PasswordHash::new(value).is_ok()
}
