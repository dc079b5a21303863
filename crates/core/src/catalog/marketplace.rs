//! Marketplace applications and per-organization platform connections.

/// A marketplace application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketplaceAppSeed {
    /// Slug, the natural key.
    pub slug: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Category.
    pub category: &'static str,
    /// Description.
    pub description: &'static str,
    /// Core apps are enabled for every organization.
    pub is_core: bool,
    /// Requires a paid plan.
    pub is_premium: bool,
}

/// Marketplace applications, in display order.
pub const MARKETPLACE_APPS: &[MarketplaceAppSeed] = &[
    MarketplaceAppSeed { slug: "campaigns", name: "Campaigns", category: "marketing", description: "Plan, launch and track campaigns", is_core: true, is_premium: false },
    MarketplaceAppSeed { slug: "social", name: "Social Publishing", category: "marketing", description: "Publish and schedule social posts", is_core: true, is_premium: false },
    MarketplaceAppSeed { slug: "analytics", name: "Analytics", category: "insights", description: "Cross-platform performance dashboards", is_core: true, is_premium: false },
    MarketplaceAppSeed { slug: "creative", name: "Creative Studio", category: "content", description: "Manage creative assets and approvals", is_core: false, is_premium: false },
    MarketplaceAppSeed { slug: "content-plans", name: "Content Plans", category: "content", description: "Editorial calendars and content plans", is_core: false, is_premium: false },
    MarketplaceAppSeed { slug: "ad-platforms", name: "Ad Platforms", category: "advertising", description: "Paid campaigns on connected ad platforms", is_core: false, is_premium: true },
    MarketplaceAppSeed { slug: "ai-assistant", name: "AI Assistant", category: "ai", description: "AI content and campaign generation", is_core: false, is_premium: true },
    MarketplaceAppSeed { slug: "social-listening", name: "Social Listening", category: "insights", description: "Track mentions and sentiment", is_core: false, is_premium: true },
    MarketplaceAppSeed { slug: "influencers", name: "Influencer Marketing", category: "marketing", description: "Discover and manage influencers", is_core: false, is_premium: true },
    MarketplaceAppSeed { slug: "automation", name: "Marketing Automation", category: "automation", description: "Rule-based workflows and triggers", is_core: false, is_premium: true },
];

/// Ad and social platforms each demo organization is connected to, keyed by
/// organization name.
pub const PLATFORM_CONNECTIONS: &[(&str, &[&str])] = &[
    ("TechVision Solutions", &["meta", "google", "linkedin"]),
    ("الشركة العربية للتسويق", &["meta", "snapchat", "tiktok"]),
    ("FashionHub Retail", &["meta", "tiktok"]),
    ("HealthWell Clinic", &["meta", "google"]),
];

/// OAuth scopes requested for a platform connection.
#[must_use]
pub fn platform_scopes(platform: &str) -> &'static [&'static str] {
    match platform {
        "meta" => &[
            "ads_management",
            "ads_read",
            "business_management",
            "instagram_basic",
            "instagram_content_publish",
            "pages_manage_posts",
            "pages_read_engagement",
        ],
        "google" => &["https://www.googleapis.com/auth/adwords"],
        "linkedin" => &["r_ads", "rw_ads", "w_organization_social"],
        "tiktok" => &["ads.read", "ads.write", "video.publish"],
        "snapchat" => &["snapchat-marketing-api"],
        _ => &[],
    }
}

/// Discriminator of a platform connection id: `"{org}:{platform}"`.
#[must_use]
pub fn connection_discriminator(org_name: &str, platform: &str) -> String {
    format!("{org_name}:{platform}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_flag::PLATFORMS;
    use crate::identity::ORGANIZATIONS;
    use std::collections::HashSet;

    #[test]
    fn test_slugs_unique() {
        let slugs: HashSet<_> = MARKETPLACE_APPS.iter().map(|a| a.slug).collect();
        assert_eq!(slugs.len(), MARKETPLACE_APPS.len());
        assert!(MARKETPLACE_APPS.iter().any(|a| a.is_core));
    }

    #[test]
    fn test_connections_reference_known_orgs_and_platforms() {
        for (org, platforms) in PLATFORM_CONNECTIONS {
            assert!(ORGANIZATIONS.iter().any(|o| o.name == *org), "{org}");
            for platform in *platforms {
                assert!(PLATFORMS.contains(platform), "{platform}");
                assert!(!platform_scopes(platform).is_empty(), "{platform}");
            }
        }
    }

    #[test]
    fn test_connection_discriminator() {
        assert_eq!(
            connection_discriminator("TechVision Solutions", "meta"),
            "TechVision Solutions:meta"
        );
    }
}
