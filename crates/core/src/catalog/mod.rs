//! Static seed catalogs.
//!
//! Data only: every table here is read by a seeder in `cmis-db` and turned
//! into rows. Nothing in this module touches a database.
//!
//! # Modules
//!
//! - `reference` - Channels, formats, markets, industries and KPIs
//! - `permissions` - Permission catalog and per-role grants
//! - `marketplace` - Marketplace apps and platform connections
//! - `flags` - Feature flag catalog with initial values
//! - `demo` - Demo content for the sample organizations

pub mod demo;
pub mod flags;
pub mod marketplace;
pub mod permissions;
pub mod reference;

pub use flags::{FlagSeed, PRIMARY_AD_PLATFORM, flag_catalog};
pub use marketplace::{
    MARKETPLACE_APPS, MarketplaceAppSeed, PLATFORM_CONNECTIONS, connection_discriminator,
    platform_scopes,
};
pub use permissions::{PERMISSIONS, PermissionSeed, grants_for};
pub use reference::{
    CHANNELS, ChannelSeed, FormatSeed, INDUSTRIES, IndustrySeed, KPIS, KpiSeed, MARKETS,
    MarketSeed, format_count,
};
