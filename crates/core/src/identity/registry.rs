//! Immutable identity registry and deterministic identifier derivation.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cmis_shared::types::{OrganizationId, RoleId, UserId};

use super::constants::{ORGANIZATIONS, ROLES, USERS};
use super::error::IdentityError;

/// Root namespace for every derived seed identifier.
///
/// Changing this value changes every derived id and breaks agreement with
/// databases seeded by earlier builds.
pub const SEED_NAMESPACE: Uuid = Uuid::from_u128(0x6c6d_6973_0000_5000_8000_636d_6973_0001);

/// Kind of entity a registry key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    /// Tenant root, keyed by display name.
    Organization,
    /// Role, keyed by role code.
    Role,
    /// User, keyed by email.
    User,
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization => write!(f, "organization"),
            Self::Role => write!(f, "role"),
            Self::User => write!(f, "user"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    kind: IdentityKind,
    id: Uuid,
}

/// Read-only mapping from human-readable keys to stable identifiers.
///
/// Built once at process start (usually with [`IdentityRegistry::from_constants`])
/// and handed to every seed step. There is no way to mutate a built registry.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    entries: HashMap<String, Entry>,
}

impl IdentityRegistry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builds the registry from the fixed organization, role and user tables.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if the constant tables contain a key twice.
    pub fn from_constants() -> Result<Self, IdentityError> {
        let mut builder = Self::builder();
        for org in ORGANIZATIONS {
            builder = builder.register(IdentityKind::Organization, org.name, org.id)?;
        }
        for role in ROLES {
            builder = builder.register(IdentityKind::Role, role.code, role.id)?;
        }
        for user in USERS {
            builder = builder.register(IdentityKind::User, user.email, user.id)?;
        }
        Ok(builder.build())
    }

    /// Returns the identifier registered for `key`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKey` if nothing is registered under `key`.
    pub fn resolve(&self, key: &str) -> Result<Uuid, IdentityError> {
        self.entries
            .get(key)
            .map(|entry| entry.id)
            .ok_or_else(|| IdentityError::UnknownKey(key.to_string()))
    }

    /// Returns the identifier for `key`, checking that it is of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKey` for a missing key and `KindMismatch` when the key
    /// belongs to another kind of entity.
    pub fn resolve_kind(&self, kind: IdentityKind, key: &str) -> Result<Uuid, IdentityError> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| IdentityError::UnknownKey(key.to_string()))?;

        if entry.kind == kind {
            Ok(entry.id)
        } else {
            Err(IdentityError::KindMismatch {
                key: key.to_string(),
                expected: kind,
                actual: entry.kind,
            })
        }
    }

    /// Resolves an organization by name.
    ///
    /// # Errors
    ///
    /// See [`IdentityRegistry::resolve_kind`].
    pub fn org(&self, name: &str) -> Result<OrganizationId, IdentityError> {
        self.resolve_kind(IdentityKind::Organization, name)
            .map(OrganizationId::from_uuid)
    }

    /// Resolves a role by code.
    ///
    /// # Errors
    ///
    /// See [`IdentityRegistry::resolve_kind`].
    pub fn role(&self, code: &str) -> Result<RoleId, IdentityError> {
        self.resolve_kind(IdentityKind::Role, code)
            .map(RoleId::from_uuid)
    }

    /// Resolves a user by email.
    ///
    /// # Errors
    ///
    /// See [`IdentityRegistry::resolve_kind`].
    pub fn user(&self, email: &str) -> Result<UserId, IdentityError> {
        self.resolve_kind(IdentityKind::User, email)
            .map(UserId::from_uuid)
    }

    /// Returns every key registered for `kind`, sorted.
    #[must_use]
    pub fn keys(&self, kind: IdentityKind) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.kind == kind)
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Computes a deterministic identifier from a namespace and discriminator.
    ///
    /// The result is a UUIDv5 of `"{namespace}-{discriminator}"` under
    /// [`SEED_NAMESPACE`]. It is a pure function: the same inputs give the same
    /// id in every process.
    ///
    /// ```
    /// use cmis_core::identity::IdentityRegistry;
    ///
    /// let a = IdentityRegistry::derive("offering", "CloudSync Pro");
    /// let b = IdentityRegistry::derive("offering", "CloudSync Pro");
    /// assert_eq!(a, b);
    /// ```
    #[must_use]
    pub fn derive(namespace: &str, discriminator: &str) -> Uuid {
        let name = format!("{namespace}-{discriminator}");
        Uuid::new_v5(&SEED_NAMESPACE, name.as_bytes())
    }
}

/// Builder for [`IdentityRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, Entry>,
}

impl RegistryBuilder {
    /// Registers `key` as an entity of `kind` with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if `key` is already registered, whatever its kind.
    pub fn register(
        mut self,
        kind: IdentityKind,
        key: &str,
        id: Uuid,
    ) -> Result<Self, IdentityError> {
        if self.entries.contains_key(key) {
            return Err(IdentityError::DuplicateKey(key.to_string()));
        }
        self.entries.insert(key.to_string(), Entry { kind, id });
        Ok(self)
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> IdentityRegistry {
        IdentityRegistry {
            entries: self.entries,
        }
    }
}
