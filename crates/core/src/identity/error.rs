//! Identity registry error types.

use thiserror::Error;

use super::registry::IdentityKind;

/// Errors raised by the identity registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The key has no registered mapping.
    #[error("Unknown identity key '{0}'")]
    UnknownKey(String),

    /// The key was registered twice while building the registry.
    #[error("Identity key '{0}' is already registered")]
    DuplicateKey(String),

    /// The key exists but maps to a different kind of entity.
    #[error("Identity key '{key}' is a {actual}, not a {expected}")]
    KindMismatch {
        /// The key that was resolved.
        key: String,
        /// The kind the caller asked for.
        expected: IdentityKind,
        /// The kind actually registered.
        actual: IdentityKind,
    },
}

impl IdentityError {
    /// Returns the key this error refers to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::UnknownKey(key) | Self::DuplicateKey(key) | Self::KindMismatch { key, .. } => key,
        }
    }
}
