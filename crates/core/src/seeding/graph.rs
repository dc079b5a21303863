//! Static dependency graph over seeded entity kinds.
//!
//! An edge `A -> B` means rows of `B` hold a foreign key to `A`, so `A` must
//! be written first. [`EntityKind::ALL`] lists every kind in a valid
//! topological order; tests enforce that.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A table the seeders write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    // Reference data
    /// Marketing channel.
    Channel,
    /// Format offered by a channel.
    ChannelFormat,
    /// Geographic market.
    Market,
    /// Industry classification.
    Industry,
    /// KPI definition.
    Kpi,

    // Identity
    /// Tenant organization.
    Organization,
    /// User account.
    User,
    /// Role.
    Role,
    /// Permission.
    Permission,
    /// Role to permission grant.
    RolePermission,
    /// User membership in an organization with a role.
    Membership,

    // Shared configuration
    /// Marketplace application.
    MarketplaceApp,
    /// Marketplace application enabled for an organization.
    OrgMarketplaceApp,
    /// Organization connection to an ad platform.
    PlatformConnection,
    /// Feature flag.
    FeatureFlag,

    // Demo content
    /// Product or service offering.
    Offering,
    /// Audience segment.
    Segment,
    /// Platform integration.
    Integration,
    /// Social media account.
    SocialAccount,
    /// Social media post.
    SocialPost,
    /// Marketing campaign.
    Campaign,
    /// Creative asset.
    CreativeAsset,
    /// Content plan.
    ContentPlan,
    /// Scheduled social post.
    ScheduledPost,
    /// Advertising account.
    AdAccount,
    /// Advertising campaign.
    AdCampaign,
}

impl EntityKind {
    /// Every kind, parents before children.
    pub const ALL: [Self; 26] = [
        Self::Channel,
        Self::ChannelFormat,
        Self::Market,
        Self::Industry,
        Self::Kpi,
        Self::Organization,
        Self::User,
        Self::Role,
        Self::Permission,
        Self::RolePermission,
        Self::Membership,
        Self::MarketplaceApp,
        Self::OrgMarketplaceApp,
        Self::PlatformConnection,
        Self::FeatureFlag,
        Self::Offering,
        Self::Segment,
        Self::Integration,
        Self::SocialAccount,
        Self::SocialPost,
        Self::Campaign,
        Self::CreativeAsset,
        Self::ContentPlan,
        Self::ScheduledPost,
        Self::AdAccount,
        Self::AdCampaign,
    ];

    /// Kinds that must exist before a row of this kind can be inserted.
    #[must_use]
    pub const fn dependencies(self) -> &'static [Self] {
        match self {
            Self::Channel
            | Self::Market
            | Self::Industry
            | Self::Kpi
            | Self::Organization
            | Self::User
            | Self::Role
            | Self::Permission
            | Self::MarketplaceApp
            | Self::FeatureFlag => &[],
            Self::ChannelFormat => &[Self::Channel],
            Self::RolePermission => &[Self::Role, Self::Permission],
            Self::Membership => &[Self::User, Self::Organization, Self::Role],
            Self::OrgMarketplaceApp => &[Self::Organization, Self::MarketplaceApp],
            Self::PlatformConnection
            | Self::Offering
            | Self::Segment
            | Self::Integration => &[Self::Organization],
            Self::SocialAccount | Self::AdAccount => &[Self::Organization, Self::Integration],
            Self::SocialPost => &[Self::Organization, Self::SocialAccount],
            Self::Campaign => &[Self::Organization, Self::User, Self::Offering],
            Self::CreativeAsset | Self::ContentPlan => &[Self::Organization, Self::Campaign],
            Self::ScheduledPost => &[Self::Organization, Self::User, Self::Campaign],
            Self::AdCampaign => &[Self::Organization, Self::AdAccount, Self::Campaign],
        }
    }

    /// Database table backing this kind.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Channel => "channels",
            Self::ChannelFormat => "channel_formats",
            Self::Market => "markets",
            Self::Industry => "industries",
            Self::Kpi => "kpis",
            Self::Organization => "orgs",
            Self::User => "users",
            Self::Role => "roles",
            Self::Permission => "permissions",
            Self::RolePermission => "role_permissions",
            Self::Membership => "user_orgs",
            Self::MarketplaceApp => "marketplace_apps",
            Self::OrgMarketplaceApp => "org_marketplace_apps",
            Self::PlatformConnection => "platform_connections",
            Self::FeatureFlag => "feature_flags",
            Self::Offering => "offerings",
            Self::Segment => "segments",
            Self::Integration => "integrations",
            Self::SocialAccount => "social_accounts",
            Self::SocialPost => "social_posts",
            Self::Campaign => "campaigns",
            Self::CreativeAsset => "creative_assets",
            Self::ContentPlan => "content_plans",
            Self::ScheduledPost => "scheduled_posts",
            Self::AdAccount => "ad_accounts",
            Self::AdCampaign => "ad_campaigns",
        }
    }

    /// Position in [`EntityKind::ALL`].
    fn rank(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(Self::ALL.len())
    }

    /// Kinds that reference this one directly.
    pub fn direct_dependents(self) -> impl Iterator<Item = Self> {
        Self::ALL
            .into_iter()
            .filter(move |kind| kind.dependencies().contains(&self))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Returns `roots` plus everything that transitively references them.
#[must_use]
pub fn dependents_closure(roots: &[EntityKind]) -> BTreeSet<EntityKind> {
    let mut closure: BTreeSet<EntityKind> = roots.iter().copied().collect();
    let mut frontier: Vec<EntityKind> = roots.to_vec();

    while let Some(kind) = frontier.pop() {
        for dependent in kind.direct_dependents() {
            if closure.insert(dependent) {
                frontier.push(dependent);
            }
        }
    }

    closure
}

/// Order in which tables must be emptied so that no remaining row points at
/// a deleted one: children first, then `roots`.
#[must_use]
pub fn truncation_order(roots: &[EntityKind]) -> Vec<EntityKind> {
    let mut kinds: Vec<EntityKind> = dependents_closure(roots).into_iter().collect();
    kinds.sort_by_key(|kind| std::cmp::Reverse(kind.rank()));
    kinds
}
