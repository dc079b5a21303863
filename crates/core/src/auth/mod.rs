//! Password hashing for seeded user accounts.

mod password;

pub use password::{PasswordError, hash_password, is_password_hash, verify_password};
