//! Feature flag domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::FeatureFlagError;

/// Ad and social platforms that have per-platform flags.
pub const PLATFORMS: [&str; 6] = ["meta", "google", "tiktok", "linkedin", "twitter", "snapchat"];

/// Feature families that exist once per platform (`{feature}.{platform}.enabled`).
pub const PLATFORM_FEATURES: [&str; 4] = ["scheduling", "paid_campaigns", "analytics", "organic_posts"];

/// Returns the platform segment of a `{feature}.{platform}.…` key.
#[must_use]
pub fn extract_platform(feature_key: &str) -> Option<&'static str> {
    let segment = feature_key.split('.').nth(1)?;
    PLATFORMS.iter().copied().find(|platform| *platform == segment)
}

/// Builds the key of a per-platform flag.
#[must_use]
pub fn platform_flag_key(feature: &str, platform: &str) -> String {
    format!("{feature}.{platform}.enabled")
}

/// Level a stored flag value applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    /// Default for everyone; `scope_id` is null.
    System,
    /// One organization; `scope_id` is the org id.
    Organization,
    /// One platform; `scope_id` is the platform name.
    Platform,
}

impl ScopeType {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Organization => "organization",
            Self::Platform => "platform",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeType {
    type Err = FeatureFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "organization" => Ok(Self::Organization),
            "platform" => Ok(Self::Platform),
            other => Err(FeatureFlagError::InvalidScope(other.to_string())),
        }
    }
}

/// Descriptive metadata stored as JSON next to every flag row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagMetadata {
    /// Grouping shown in the admin list (`core`, `ai`, `integrations`, ...).
    pub category: String,
    /// Human-readable description.
    pub description: String,
    /// Keys of flags that must be enabled before this one.
    pub dependencies: Vec<String>,
    /// Changes only take effect after a restart.
    pub requires_restart: bool,
    /// Experimental feature.
    pub is_experimental: bool,
    /// Still under development.
    pub in_development: bool,
}

/// A flag as shown to an organization admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagView {
    /// Flag key.
    pub flag_key: String,
    /// Category from metadata.
    pub category: String,
    /// Description from metadata.
    pub description: String,
    /// Effective value for the organization.
    pub is_enabled: bool,
    /// Experimental tag.
    pub is_experimental: bool,
    /// In-development tag.
    pub in_development: bool,
    /// Toggling needs a restart to take effect.
    pub requires_restart: bool,
    /// Prerequisite flag keys.
    pub dependencies: Vec<String>,
    /// Version of the row that decided the value, if it is org-scoped.
    pub version: i32,
    /// Last write time of the deciding row.
    pub last_updated: Option<DateTime<Utc>>,
}

impl FlagView {
    /// Builds a view from metadata and a resolved value.
    #[must_use]
    pub fn new(flag_key: &str, metadata: &FlagMetadata, is_enabled: bool) -> Self {
        Self {
            flag_key: flag_key.to_string(),
            category: metadata.category.clone(),
            description: metadata.description.clone(),
            is_enabled,
            is_experimental: metadata.is_experimental,
            in_development: metadata.in_development,
            requires_restart: metadata.requires_restart,
            dependencies: metadata.dependencies.clone(),
            version: 0,
            last_updated: None,
        }
    }
}

/// Status filter of the admin list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No filtering.
    #[default]
    All,
    /// Enabled flags.
    Enabled,
    /// Disabled flags.
    Disabled,
    /// Experimental flags, whatever their state.
    Experimental,
}

impl FromStr for StatusFilter {
    type Err = FeatureFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            "experimental" => Ok(Self::Experimental),
            other => Err(FeatureFlagError::InvalidFilter(other.to_string())),
        }
    }
}

/// Category and status filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagFilter {
    /// Category to keep; `None` or `"all"` keeps every category.
    pub category: Option<String>,
    /// Status to keep.
    pub status: StatusFilter,
}

impl FlagFilter {
    /// Returns true if `flag` is visible under this filter.
    #[must_use]
    pub fn matches(&self, flag: &FlagView) -> bool {
        let category_match = match self.category.as_deref() {
            None | Some("all" | "") => true,
            Some(category) => flag.category == category,
        };
        let status_match = match self.status {
            StatusFilter::All => true,
            StatusFilter::Enabled => flag.is_enabled,
            StatusFilter::Disabled => !flag.is_enabled,
            StatusFilter::Experimental => flag.is_experimental,
        };
        category_match && status_match
    }
}

/// Counters shown above the admin list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlagStats {
    /// Enabled and not experimental.
    pub enabled: usize,
    /// Disabled.
    pub disabled: usize,
    /// Experimental.
    pub experimental: usize,
    /// In development.
    pub in_development: usize,
}

impl FlagStats {
    /// Computes stats over `flags`.
    #[must_use]
    pub fn from_flags(flags: &[FlagView]) -> Self {
        flags.iter().fold(Self::default(), |mut stats, flag| {
            if flag.is_enabled && !flag.is_experimental {
                stats.enabled += 1;
            }
            if !flag.is_enabled {
                stats.disabled += 1;
            }
            if flag.is_experimental {
                stats.experimental += 1;
            }
            if flag.in_development {
                stats.in_development += 1;
            }
            stats
        })
    }
}

/// Result of a single toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    /// Flag key.
    pub flag_key: String,
    /// Stored value after the toggle.
    pub enabled: bool,
    /// False when the flag already had the requested value.
    pub changed: bool,
    /// The change only applies after a restart.
    pub requires_restart: bool,
    /// Row version after the write.
    pub version: i32,
    /// Write time.
    pub last_updated: DateTime<Utc>,
}

/// A flag left disabled by a bulk enable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFlag {
    /// Flag key.
    pub flag_key: String,
    /// Prerequisites that stayed disabled.
    pub missing: Vec<String>,
}

/// Result of `enable_all` / `disable_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Flags whose value was written.
    pub changed: Vec<String>,
    /// Flags that already had the requested value.
    pub unchanged: Vec<String>,
    /// Flags a bulk enable could not turn on.
    pub skipped: Vec<SkippedFlag>,
    /// Flags a platform row or organization override keeps in the other state.
    pub overridden: Vec<String>,
    /// At least one changed flag requires a restart.
    pub requires_restart: bool,
}
