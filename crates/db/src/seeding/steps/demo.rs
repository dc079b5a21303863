//! Demo content for the sample organizations.
//!
//! Demo stages are run-once: the rows are plain inserts and the ledger keeps
//! them from being written twice. Dates are relative to the run start.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use sea_orm::{DatabaseTransaction, Set};
use serde_json::json;

use cmis_core::catalog::demo::{
    AD_ACCOUNTS, AD_CAMPAIGNS, CAMPAIGNS, CONTENT_PLANS, CREATIVE_ASSETS, INTEGRATIONS,
    OFFERINGS, SCHEDULED_POSTS, SEGMENTS, SOCIAL_ACCOUNTS, SOCIAL_POSTS, cents, demo_id,
};
use cmis_core::seeding::{EntityKind, SeedError, StepManifest, StepSummary};

use crate::entities::{
    ad_accounts, ad_campaigns, campaigns, content_plans, creative_assets, integrations, offerings,
    scheduled_posts, segments, social_accounts, social_posts,
};
use crate::seeding::context::SeedContext;
use crate::seeding::step::{SeedStep, insert_all};

/// Default flight length of an ad campaign, in days.
const AD_FLIGHT_DAYS: i64 = 30;

fn day(ctx: &SeedContext, offset: i64) -> NaiveDate {
    (ctx.started_at() + Duration::days(offset)).date_naive()
}

fn integration_id(org: &str, platform: &str) -> uuid::Uuid {
    demo_id("integration", org, platform)
}

fn campaign_id(org: &str, name: &str) -> uuid::Uuid {
    demo_id("campaign", org, name)
}

/// Products and services.
pub struct OfferingsStep;

#[async_trait]
impl SeedStep for OfferingsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_offerings", &[EntityKind::Offering])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let rows = OFFERINGS
            .iter()
            .map(|offering| {
                Ok(offerings::ActiveModel {
                    id: Set(demo_id("offering", offering.org, offering.name)),
                    org_id: Set(ctx.org(step, offering.org)?),
                    kind: Set(offering.kind.to_string()),
                    name: Set(offering.name.to_string()),
                    description: Set(offering.description.to_string()),
                    created_at: Set(ctx.timestamp()),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Audience segments with persona attributes.
pub struct SegmentsStep;

#[async_trait]
impl SeedStep for SegmentsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_segments", &[EntityKind::Segment])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let rows = SEGMENTS
            .iter()
            .map(|segment| {
                let persona: serde_json::Map<String, serde_json::Value> = segment
                    .persona
                    .iter()
                    .map(|(key, value)| ((*key).to_string(), json!(value)))
                    .collect();
                Ok(segments::ActiveModel {
                    id: Set(demo_id("segment", segment.org, segment.name)),
                    org_id: Set(ctx.org(step, segment.org)?),
                    name: Set(segment.name.to_string()),
                    persona: Set(serde_json::Value::Object(persona)),
                    notes: Set(segment.notes.to_string()),
                    created_at: Set(ctx.timestamp()),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Platform integrations.
pub struct IntegrationsStep;

#[async_trait]
impl SeedStep for IntegrationsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_integrations", &[EntityKind::Integration])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let rows = INTEGRATIONS
            .iter()
            .map(|integration| {
                Ok(integrations::ActiveModel {
                    id: Set(integration_id(integration.org, integration.platform)),
                    org_id: Set(ctx.org(step, integration.org)?),
                    platform: Set(integration.platform.to_string()),
                    account_id: Set(integration.account_id.to_string()),
                    username: Set(integration.username.map(str::to_string)),
                    provider: Set(integration.provider.to_string()),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Social media accounts behind the integrations.
pub struct SocialAccountsStep;

#[async_trait]
impl SeedStep for SocialAccountsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_social_accounts", &[EntityKind::SocialAccount])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let rows = SOCIAL_ACCOUNTS
            .iter()
            .map(|account| {
                Ok(social_accounts::ActiveModel {
                    id: Set(demo_id("social-account", account.org, account.username)),
                    org_id: Set(ctx.org(step, account.org)?),
                    integration_id: Set(integration_id(account.org, account.platform)),
                    external_id: Set(account.external_id.to_string()),
                    username: Set(account.username.to_string()),
                    display_name: Set(account.display_name.to_string()),
                    biography: Set(account.biography.to_string()),
                    followers_count: Set(account.followers),
                    follows_count: Set(account.follows),
                    media_count: Set(account.media_count),
                    website: Set(account.website.to_string()),
                    category: Set(account.category.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Advertising accounts.
pub struct AdAccountsStep;

#[async_trait]
impl SeedStep for AdAccountsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_ad_accounts", &[EntityKind::AdAccount])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let rows = AD_ACCOUNTS
            .iter()
            .map(|account| {
                Ok(ad_accounts::ActiveModel {
                    id: Set(demo_id("ad-account", account.org, account.external_id)),
                    org_id: Set(ctx.org(step, account.org)?),
                    integration_id: Set(integration_id(account.org, account.platform)),
                    external_id: Set(account.external_id.to_string()),
                    name: Set(account.name.to_string()),
                    currency: Set(account.currency.to_string()),
                    timezone: Set(account.timezone.to_string()),
                    spend_cap: Set(cents(account.spend_cap_cents)),
                    status: Set("active".to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Marketing campaigns.
pub struct CampaignsStep;

#[async_trait]
impl SeedStep for CampaignsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_campaigns", &[EntityKind::Campaign])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let rows = CAMPAIGNS
            .iter()
            .map(|campaign| {
                Ok(campaigns::ActiveModel {
                    id: Set(campaign_id(campaign.org, campaign.name)),
                    org_id: Set(ctx.org(step, campaign.org)?),
                    offering_id: Set(campaign
                        .offering
                        .map(|name| demo_id("offering", campaign.org, name))),
                    name: Set(campaign.name.to_string()),
                    objective: Set(campaign.objective.to_string()),
                    status: Set(campaign.status.to_string()),
                    budget: Set(campaign.budget()),
                    currency: Set(campaign.currency.to_string()),
                    description: Set(campaign.description.to_string()),
                    start_date: Set(day(ctx, campaign.start_offset_days)),
                    end_date: Set(day(ctx, campaign.end_offset_days)),
                    created_by: Set(ctx.user(step, campaign.created_by)?),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Published social posts with engagement metrics.
pub struct SocialPostsStep;

#[async_trait]
impl SeedStep for SocialPostsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_social_posts", &[EntityKind::SocialPost])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let rows = SOCIAL_POSTS
            .iter()
            .map(|post| {
                Ok(social_posts::ActiveModel {
                    id: Set(demo_id("social-post", post.org, post.external_id)),
                    org_id: Set(ctx.org(step, post.org)?),
                    social_account_id: Set(demo_id("social-account", post.org, post.account)),
                    external_id: Set(post.external_id.to_string()),
                    caption: Set(post.caption.to_string()),
                    media_type: Set(post.media_type.to_string()),
                    metrics: Set(json!({
                        "likes": post.likes,
                        "comments": post.comments,
                        "shares": post.shares,
                        "saves": post.saves,
                    })),
                    posted_at: Set((ctx.started_at() - Duration::days(post.posted_days_ago)).into()),
                    created_at: Set(ctx.timestamp()),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Creative assets. Channel and format are stored as codes.
pub struct CreativeAssetsStep;

#[async_trait]
impl SeedStep for CreativeAssetsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_creative_assets", &[EntityKind::CreativeAsset])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let rows = CREATIVE_ASSETS
            .iter()
            .map(|asset| {
                let key = format!("{}:{}", asset.campaign, asset.variation_tag);
                Ok(creative_assets::ActiveModel {
                    id: Set(demo_id("creative-asset", asset.org, &key)),
                    org_id: Set(ctx.org(step, asset.org)?),
                    campaign_id: Set(campaign_id(asset.org, asset.campaign)),
                    channel_code: Set(asset.channel.to_string()),
                    format_code: Set(asset.format.to_string()),
                    variation_tag: Set(asset.variation_tag.to_string()),
                    headline: Set(asset.headline.to_string()),
                    copy_block: Set(asset.copy.to_string()),
                    cta: Set(asset.cta.to_string()),
                    status: Set(asset.status.to_string()),
                    created_at: Set(ctx.timestamp()),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Content plans.
pub struct ContentPlansStep;

#[async_trait]
impl SeedStep for ContentPlansStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_content_plans", &[EntityKind::ContentPlan])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let rows = CONTENT_PLANS
            .iter()
            .map(|plan| {
                Ok(content_plans::ActiveModel {
                    id: Set(demo_id("content-plan", plan.org, plan.name)),
                    org_id: Set(ctx.org(step, plan.org)?),
                    campaign_id: Set(campaign_id(plan.org, plan.campaign)),
                    name: Set(plan.name.to_string()),
                    starts_on: Set(day(ctx, plan.start_offset_days)),
                    ends_on: Set(day(ctx, plan.end_offset_days)),
                    strategy: Set(json!({
                        "objectives": plan.objectives,
                        "posting_frequency": plan.posting_frequency,
                        "content_themes": plan.themes,
                    })),
                    created_at: Set(ctx.timestamp()),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Upcoming scheduled posts.
pub struct ScheduledPostsStep;

#[async_trait]
impl SeedStep for ScheduledPostsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_scheduled_posts", &[EntityKind::ScheduledPost])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let rows = SCHEDULED_POSTS
            .iter()
            .map(|post| {
                let time = NaiveTime::from_hms_opt(post.hour, 0, 0).unwrap_or(NaiveTime::MIN);
                let key = format!("{}:{}:{}", post.campaign, post.in_days, post.hour);
                Ok(scheduled_posts::ActiveModel {
                    id: Set(demo_id("scheduled-post", post.org, &key)),
                    org_id: Set(ctx.org(step, post.org)?),
                    user_id: Set(ctx.user(step, post.user)?),
                    campaign_id: Set(campaign_id(post.org, post.campaign)),
                    platforms: Set(json!(post.platforms)),
                    content: Set(post.content.to_string()),
                    scheduled_at: Set(day(ctx, post.in_days).and_time(time).and_utc().into()),
                    status: Set("scheduled".to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}

/// Paid campaigns on the ad accounts.
pub struct AdCampaignsStep;

#[async_trait]
impl SeedStep for AdCampaignsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("demo_ad_campaigns", &[EntityKind::AdCampaign])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let rows = AD_CAMPAIGNS
            .iter()
            .map(|ad| {
                Ok(ad_campaigns::ActiveModel {
                    id: Set(demo_id("ad-campaign", ad.org, ad.name)),
                    org_id: Set(ctx.org(step, ad.org)?),
                    ad_account_id: Set(demo_id("ad-account", ad.org, ad.ad_account)),
                    campaign_id: Set(campaign_id(ad.org, ad.campaign)),
                    name: Set(ad.name.to_string()),
                    objective: Set(ad.objective.to_string()),
                    status: Set(ad.status.to_string()),
                    budget: Set(cents(ad.budget_cents)),
                    start_date: Set(day(ctx, 0)),
                    end_date: Set(day(ctx, AD_FLIGHT_DAYS)),
                    created_at: Set(ctx.timestamp()),
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        insert_all(txn, step, rows).await
    }
}
