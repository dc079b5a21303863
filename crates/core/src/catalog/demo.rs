//! Demo content for the sample organizations.
//!
//! Rows reference each other by natural keys (organization name, platform,
//! username, campaign name). Seeders turn those keys into ids with
//! [`demo_id`], so a campaign and the creative asset pointing at it agree on
//! the campaign id without reading it back.
//!
//! Money is kept in minor units and converted with [`cents`].

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::identity::IdentityRegistry;

/// Deterministic id of a demo row: `derive(namespace, "{org}:{name}")`.
#[must_use]
pub fn demo_id(namespace: &str, org: &str, name: &str) -> Uuid {
    IdentityRegistry::derive(namespace, &format!("{org}:{name}"))
}

/// Converts minor units to a two-decimal amount.
#[must_use]
pub fn cents(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// A product or service an organization markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferingSeed {
    /// Owning organization.
    pub org: &'static str,
    /// `product` or `service`.
    pub kind: &'static str,
    /// Name, unique per organization.
    pub name: &'static str,
    /// Description.
    pub description: &'static str,
}

/// An audience segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSeed {
    /// Owning organization.
    pub org: &'static str,
    /// Name, unique per organization.
    pub name: &'static str,
    /// Persona attributes, stored as a JSON object.
    pub persona: &'static [(&'static str, &'static str)],
    /// Notes.
    pub notes: &'static str,
}

/// A connected social or ads integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrationSeed {
    /// Owning organization.
    pub org: &'static str,
    /// Platform slug (`instagram`, `facebook_ads`, ...).
    pub platform: &'static str,
    /// Account id on the platform.
    pub account_id: &'static str,
    /// Public handle, if the platform has one.
    pub username: Option<&'static str>,
    /// Upstream provider.
    pub provider: &'static str,
}

/// A social profile fetched through an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialAccountSeed {
    /// Owning organization.
    pub org: &'static str,
    /// Platform of the integration it was fetched through.
    pub platform: &'static str,
    /// Account id on the platform.
    pub external_id: &'static str,
    /// Handle, unique per organization.
    pub username: &'static str,
    /// Display name.
    pub display_name: &'static str,
    /// Profile biography.
    pub biography: &'static str,
    /// Followers.
    pub followers: i32,
    /// Accounts followed.
    pub follows: i32,
    /// Published media.
    pub media_count: i32,
    /// Website.
    pub website: &'static str,
    /// Profile category.
    pub category: &'static str,
}

/// A published social post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialPostSeed {
    /// Owning organization.
    pub org: &'static str,
    /// Username of the account it was published on.
    pub account: &'static str,
    /// Post id on the platform.
    pub external_id: &'static str,
    /// Caption.
    pub caption: &'static str,
    /// `IMAGE`, `VIDEO` or `CAROUSEL_ALBUM`.
    pub media_type: &'static str,
    /// Likes.
    pub likes: i32,
    /// Comments.
    pub comments: i32,
    /// Shares.
    pub shares: i32,
    /// Saves.
    pub saves: i32,
    /// Days before the seed run it was published.
    pub posted_days_ago: i64,
}

/// An advertising account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdAccountSeed {
    /// Owning organization.
    pub org: &'static str,
    /// Platform of the owning integration.
    pub platform: &'static str,
    /// Account id on the platform.
    pub external_id: &'static str,
    /// Name.
    pub name: &'static str,
    /// ISO 4217 currency.
    pub currency: &'static str,
    /// IANA timezone.
    pub timezone: &'static str,
    /// Spend cap in minor units.
    pub spend_cap_cents: i64,
}

/// A marketing campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignSeed {
    /// Owning organization.
    pub org: &'static str,
    /// Name, unique per organization.
    pub name: &'static str,
    /// Objective.
    pub objective: &'static str,
    /// Status.
    pub status: &'static str,
    /// Promoted offering, by name.
    pub offering: Option<&'static str>,
    /// Budget in minor units.
    pub budget_cents: i64,
    /// ISO 4217 currency.
    pub currency: &'static str,
    /// Description.
    pub description: &'static str,
    /// Creator, by email.
    pub created_by: &'static str,
    /// Start, in days relative to the seed run.
    pub start_offset_days: i64,
    /// End, in days relative to the seed run.
    pub end_offset_days: i64,
}

impl CampaignSeed {
    /// Budget as a decimal amount.
    #[must_use]
    pub fn budget(&self) -> Decimal {
        cents(self.budget_cents)
    }
}

/// A creative variation of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreativeAssetSeed {
    /// Owning organization.
    pub org: &'static str,
    /// Campaign name.
    pub campaign: &'static str,
    /// Channel code from the reference catalog.
    pub channel: &'static str,
    /// Format code from the reference catalog.
    pub format: &'static str,
    /// Variation tag, unique per campaign.
    pub variation_tag: &'static str,
    /// Headline.
    pub headline: &'static str,
    /// Body copy.
    pub copy: &'static str,
    /// Call to action.
    pub cta: &'static str,
    /// Review status.
    pub status: &'static str,
}

/// An editorial plan attached to a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentPlanSeed {
    /// Owning organization.
    pub org: &'static str,
    /// Campaign name.
    pub campaign: &'static str,
    /// Plan name.
    pub name: &'static str,
    /// Strategy objectives.
    pub objectives: &'static [&'static str],
    /// Posting frequency.
    pub posting_frequency: &'static str,
    /// Content themes.
    pub themes: &'static [&'static str],
    /// Start, in days relative to the seed run.
    pub start_offset_days: i64,
    /// End, in days relative to the seed run.
    pub end_offset_days: i64,
}

/// A post queued for publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledPostSeed {
    /// Owning organization.
    pub org: &'static str,
    /// Author, by email.
    pub user: &'static str,
    /// Campaign name.
    pub campaign: &'static str,
    /// Target platforms.
    pub platforms: &'static [&'static str],
    /// Post text.
    pub content: &'static str,
    /// Days after the seed run it goes out.
    pub in_days: i64,
    /// Hour of day (UTC) it goes out.
    pub hour: u32,
}

/// A paid campaign on an ad platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdCampaignSeed {
    /// Owning organization.
    pub org: &'static str,
    /// External id of the ad account.
    pub ad_account: &'static str,
    /// Marketing campaign it belongs to.
    pub campaign: &'static str,
    /// Name on the platform.
    pub name: &'static str,
    /// Platform objective.
    pub objective: &'static str,
    /// Platform status.
    pub status: &'static str,
    /// Budget in minor units.
    pub budget_cents: i64,
}

const TECHVISION: &str = "TechVision Solutions";
const FASHIONHUB: &str = "FashionHub Retail";

/// Offerings.
pub const OFFERINGS: &[OfferingSeed] = &[
    OfferingSeed { org: TECHVISION, kind: "product", name: "CloudSync Pro", description: "Enterprise cloud synchronization platform" },
    OfferingSeed { org: TECHVISION, kind: "service", name: "Tech Consulting", description: "Expert technology consulting services" },
    OfferingSeed { org: FASHIONHUB, kind: "product", name: "Summer Collection 2025", description: "Latest summer fashion trends" },
    OfferingSeed { org: FASHIONHUB, kind: "product", name: "Premium Accessories", description: "Luxury fashion accessories" },
];

/// Audience segments.
pub const SEGMENTS: &[SegmentSeed] = &[
    SegmentSeed {
        org: TECHVISION,
        name: "Enterprise IT Directors",
        persona: &[("age_range", "35-55"), ("job_title", "IT Director"), ("company_size", "500+")],
        notes: "Decision makers for enterprise software",
    },
    SegmentSeed {
        org: FASHIONHUB,
        name: "Fashion Enthusiasts 18-35",
        persona: &[("age_range", "18-35"), ("interests", "fashion, lifestyle, trends")],
        notes: "Young adults following fashion trends",
    },
];

/// Integrations. Access tokens are never seeded.
pub const INTEGRATIONS: &[IntegrationSeed] = &[
    IntegrationSeed { org: TECHVISION, platform: "instagram", account_id: "techvision_official", username: Some("techvision_official"), provider: "meta" },
    IntegrationSeed { org: FASHIONHUB, platform: "instagram", account_id: "fashionhub_style", username: Some("fashionhub_style"), provider: "meta" },
    IntegrationSeed { org: TECHVISION, platform: "facebook_ads", account_id: "act_123456789", username: None, provider: "meta" },
];

/// Social accounts.
pub const SOCIAL_ACCOUNTS: &[SocialAccountSeed] = &[
    SocialAccountSeed {
        org: TECHVISION,
        platform: "instagram",
        external_id: "17841405309211844",
        username: "techvision_official",
        display_name: "TechVision Solutions",
        biography: "Enterprise cloud solutions for modern businesses",
        followers: 12_543,
        follows: 342,
        media_count: 156,
        website: "https://techvision.com",
        category: "Technology",
    },
    SocialAccountSeed {
        org: FASHIONHUB,
        platform: "instagram",
        external_id: "17841405309211845",
        username: "fashionhub_style",
        display_name: "FashionHub | Style Inspiration",
        biography: "Your daily dose of fashion inspiration | Shop the latest trends",
        followers: 45_621,
        follows: 1_234,
        media_count: 892,
        website: "https://fashionhub.com",
        category: "Fashion",
    },
];

/// Published posts.
pub const SOCIAL_POSTS: &[SocialPostSeed] = &[
    SocialPostSeed {
        org: TECHVISION,
        account: "techvision_official",
        external_id: "18123456789012345",
        caption: "Introducing CloudSync Pro! The enterprise cloud platform built for modern teams. #CloudSync #Enterprise #Technology",
        media_type: "IMAGE",
        likes: 234,
        comments: 18,
        shares: 12,
        saves: 45,
        posted_days_ago: 10,
    },
    SocialPostSeed {
        org: FASHIONHUB,
        account: "fashionhub_style",
        external_id: "18123456789012346",
        caption: "Summer vibes are here! Check out our new collection. Link in bio! #SummerFashion #OOTD #Style",
        media_type: "CAROUSEL_ALBUM",
        likes: 1_253,
        comments: 87,
        shares: 34,
        saves: 156,
        posted_days_ago: 5,
    },
];

/// Ad accounts.
pub const AD_ACCOUNTS: &[AdAccountSeed] = &[AdAccountSeed {
    org: TECHVISION,
    platform: "facebook_ads",
    external_id: "act_123456789",
    name: "TechVision Ad Account",
    currency: "USD",
    timezone: "America/New_York",
    spend_cap_cents: 5_000_000,
}];

/// Campaigns.
pub const CAMPAIGNS: &[CampaignSeed] = &[
    CampaignSeed {
        org: TECHVISION,
        name: "CloudSync Pro Launch Campaign",
        objective: "conversions",
        status: "active",
        offering: Some("CloudSync Pro"),
        budget_cents: 2_500_000,
        currency: "USD",
        description: "Product launch campaign for CloudSync Pro targeting enterprise customers",
        created_by: "sarah@techvision.com",
        start_offset_days: -15,
        end_offset_days: 45,
    },
    CampaignSeed {
        org: FASHIONHUB,
        name: "Summer Collection 2025",
        objective: "catalog_sales",
        status: "active",
        offering: Some("Summer Collection 2025"),
        budget_cents: 1_500_000,
        currency: "EUR",
        description: "Promote summer fashion collection across social media",
        created_by: "emma@fashionhub.com",
        start_offset_days: -30,
        end_offset_days: 60,
    },
];

/// Creative assets.
pub const CREATIVE_ASSETS: &[CreativeAssetSeed] = &[CreativeAssetSeed {
    org: TECHVISION,
    campaign: "CloudSync Pro Launch Campaign",
    channel: "instagram",
    format: "feed_image",
    variation_tag: "A",
    headline: "CloudSync Pro - Enterprise Cloud Platform",
    copy: "Transform your enterprise with CloudSync Pro",
    cta: "Learn More",
    status: "approved",
}];

/// Content plans.
pub const CONTENT_PLANS: &[ContentPlanSeed] = &[ContentPlanSeed {
    org: FASHIONHUB,
    campaign: "Summer Collection 2025",
    name: "Summer Collection Social Media Plan",
    objectives: &["brand_awareness", "sales"],
    posting_frequency: "daily",
    themes: &["summer_trends", "styling_tips", "product_highlights"],
    start_offset_days: -30,
    end_offset_days: 60,
}];

/// Scheduled posts.
pub const SCHEDULED_POSTS: &[ScheduledPostSeed] = &[
    ScheduledPostSeed {
        org: TECHVISION,
        user: "sarah@techvision.com",
        campaign: "CloudSync Pro Launch Campaign",
        platforms: &["instagram", "facebook"],
        content: "Week 2 of CloudSync Pro launch! See how enterprise teams are transforming their workflows. #CloudSync #Productivity",
        in_days: 2,
        hour: 10,
    },
    ScheduledPostSeed {
        org: FASHIONHUB,
        user: "emma@fashionhub.com",
        campaign: "Summer Collection 2025",
        platforms: &["instagram"],
        content: "New arrivals just dropped! Swipe to see the hottest summer trends. Which is your favorite? #NewArrivals #SummerStyle",
        in_days: 1,
        hour: 14,
    },
];

/// Paid campaigns.
pub const AD_CAMPAIGNS: &[AdCampaignSeed] = &[AdCampaignSeed {
    org: TECHVISION,
    ad_account: "act_123456789",
    campaign: "CloudSync Pro Launch Campaign",
    name: "CloudSync Pro - Lead Generation",
    objective: "OUTCOME_LEADS",
    status: "ACTIVE",
    budget_cents: 1_000_000,
}];
