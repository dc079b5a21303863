//! Feature flags: resolution, dependency-gated toggling and admin listing.
//!
//! # Modules
//!
//! - `types` - Scopes, metadata, views, filters and outcomes
//! - `rules` - Effective-value resolution and dependency rules
//! - `cache` - Moka cache of resolved values
//! - `error` - Feature flag error types

pub mod cache;
pub mod error;
pub mod rules;
pub mod types;

pub use cache::FlagCache;
pub use error::FeatureFlagError;
pub use rules::{
    BulkPlan, FeatureFlagRules, FeatureMatrix, OverrideValue, Precedence, Resolution,
};
pub use types::{
    BulkOutcome, FlagFilter, FlagMetadata, FlagStats, FlagView, PLATFORM_FEATURES,
    PLATFORMS, ScopeType, SkippedFlag, StatusFilter, ToggleOutcome, extract_platform,
    platform_flag_key,
};
