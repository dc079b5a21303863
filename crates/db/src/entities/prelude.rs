//! Entity aliases, `use crate::entities::prelude::*` style.

pub use super::ad_accounts::Entity as AdAccounts;
pub use super::ad_campaigns::Entity as AdCampaigns;
pub use super::campaigns::Entity as Campaigns;
pub use super::channel_formats::Entity as ChannelFormats;
pub use super::channels::Entity as Channels;
pub use super::content_plans::Entity as ContentPlans;
pub use super::creative_assets::Entity as CreativeAssets;
pub use super::feature_flag_overrides::Entity as FeatureFlagOverrides;
pub use super::feature_flags::Entity as FeatureFlags;
pub use super::industries::Entity as Industries;
pub use super::integrations::Entity as Integrations;
pub use super::kpis::Entity as Kpis;
pub use super::marketplace_apps::Entity as MarketplaceApps;
pub use super::markets::Entity as Markets;
pub use super::offerings::Entity as Offerings;
pub use super::org_marketplace_apps::Entity as OrgMarketplaceApps;
pub use super::orgs::Entity as Orgs;
pub use super::permissions::Entity as Permissions;
pub use super::platform_connections::Entity as PlatformConnections;
pub use super::role_permissions::Entity as RolePermissions;
pub use super::roles::Entity as Roles;
pub use super::scheduled_posts::Entity as ScheduledPosts;
pub use super::seed_runs::Entity as SeedRuns;
pub use super::segments::Entity as Segments;
pub use super::social_accounts::Entity as SocialAccounts;
pub use super::social_posts::Entity as SocialPosts;
pub use super::user_orgs::Entity as UserOrgs;
pub use super::users::Entity as Users;
