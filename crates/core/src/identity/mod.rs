//! Identity registry for seeded entities.
//!
//! Independent seed steps agree on organization, role and user identifiers
//! without querying each other mid-transaction. Well-known entities come from
//! the fixed tables in [`constants`]; everything else is derived with
//! [`IdentityRegistry::derive`].
//!
//! # Modules
//!
//! - `constants` - Fixed identifiers for well-known orgs, roles and users
//! - `registry` - Immutable key → id lookup and deterministic derivation
//! - `error` - Registry error types

pub mod constants;
pub mod error;
pub mod registry;

pub use constants::{
    ADMIN_USER_EMAIL, ARABIC_MARKETING_ORG_ID, FASHIONHUB_ORG_ID, HEALTHWELL_ORG_ID, MEMBERSHIPS,
    ORGANIZATIONS, OrganizationSeed, ROLES, RoleSeed, TECHVISION_ORG_ID, USERS, UserSeed,
};
pub use error::IdentityError;
pub use registry::{IdentityKind, IdentityRegistry, RegistryBuilder, SEED_NAMESPACE};
