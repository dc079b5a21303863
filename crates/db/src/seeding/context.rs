//! Per-run state handed to every seed step.

use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use cmis_core::auth::{PasswordError, hash_password};
use cmis_core::identity::IdentityRegistry;
use cmis_core::seeding::SeedError;
use cmis_shared::config::SeederConfig;

/// Immutable inputs of one seed run.
///
/// Steps never reach for globals: identifiers come from the registry held
/// here, and every row written in a run carries the same timestamp.
#[derive(Debug, Clone)]
pub struct SeedContext {
    registry: IdentityRegistry,
    config: SeederConfig,
    started_at: DateTime<Utc>,
    password_hash: String,
}

impl SeedContext {
    /// Builds the context, hashing the demo password once for the whole run.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured demo password cannot be hashed.
    pub fn new(registry: IdentityRegistry, config: SeederConfig) -> Result<Self, PasswordError> {
        let password_hash = hash_password(&config.demo_password)?;
        Ok(Self {
            registry,
            config,
            started_at: Utc::now(),
            password_hash,
        })
    }

    /// Identity registry.
    #[must_use]
    pub const fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Seeder configuration.
    #[must_use]
    pub const fn config(&self) -> &SeederConfig {
        &self.config
    }

    /// Start of the run.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Start of the run, as stored in timestamp columns.
    #[must_use]
    pub fn timestamp(&self) -> DateTimeWithTimeZone {
        self.started_at.into()
    }

    /// PHC hash of the demo password.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Resolves an organization id for `step`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKey` naming `step` if the organization is not registered.
    pub fn org(&self, step: &str, name: &str) -> Result<Uuid, SeedError> {
        self.registry
            .org(name)
            .map(|id| id.into_inner())
            .map_err(|e| SeedError::identity(step, &e))
    }

    /// Resolves a user id for `step`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKey` naming `step` if the user is not registered.
    pub fn user(&self, step: &str, email: &str) -> Result<Uuid, SeedError> {
        self.registry
            .user(email)
            .map(|id| id.into_inner())
            .map_err(|e| SeedError::identity(step, &e))
    }

    /// Resolves a role id for `step`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKey` naming `step` if the role is not registered.
    pub fn role(&self, step: &str, code: &str) -> Result<Uuid, SeedError> {
        self.registry
            .role(code)
            .map(|id| id.into_inner())
            .map_err(|e| SeedError::identity(step, &e))
    }
}
