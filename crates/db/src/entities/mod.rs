//! `SeaORM` entity definitions, one module per table.

pub mod prelude;

pub mod ad_accounts;
pub mod ad_campaigns;
pub mod campaigns;
pub mod channel_formats;
pub mod channels;
pub mod content_plans;
pub mod creative_assets;
pub mod feature_flag_overrides;
pub mod feature_flags;
pub mod industries;
pub mod integrations;
pub mod kpis;
pub mod marketplace_apps;
pub mod markets;
pub mod offerings;
pub mod org_marketplace_apps;
pub mod orgs;
pub mod permissions;
pub mod platform_connections;
pub mod role_permissions;
pub mod roles;
pub mod scheduled_posts;
pub mod seed_runs;
pub mod segments;
pub mod social_accounts;
pub mod social_posts;
pub mod user_orgs;
pub mod users;
