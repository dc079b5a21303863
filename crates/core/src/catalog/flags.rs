//! Feature flags created by the seeder with their initial system values.

use crate::feature_flag::{FlagMetadata, PLATFORM_FEATURES, PLATFORMS, platform_flag_key};

/// A system-scope flag and its initial value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSeed {
    /// Flag key.
    pub key: String,
    /// Initial system value.
    pub enabled: bool,
    /// Metadata.
    pub metadata: FlagMetadata,
}

/// Platform that every other paid-campaign platform builds on.
pub const PRIMARY_AD_PLATFORM: &str = "meta";

struct StandaloneFlag {
    key: &'static str,
    enabled: bool,
    category: &'static str,
    description: &'static str,
    dependencies: &'static [&'static str],
    requires_restart: bool,
    is_experimental: bool,
    in_development: bool,
}

const STANDALONE: &[StandaloneFlag] = &[
    StandaloneFlag {
        key: "core.multi_currency",
        enabled: true,
        category: "core",
        description: "Budgets and reports in the organization's own currency",
        dependencies: &[],
        requires_restart: true,
        is_experimental: false,
        in_development: false,
    },
    StandaloneFlag {
        key: "ai.content_generation",
        enabled: false,
        category: "ai",
        description: "Generate post copy and captions with AI",
        dependencies: &[],
        requires_restart: false,
        is_experimental: false,
        in_development: false,
    },
    StandaloneFlag {
        key: "ai.campaign_generation",
        enabled: false,
        category: "ai",
        description: "Draft whole campaigns from a brief",
        dependencies: &["ai.content_generation"],
        requires_restart: false,
        is_experimental: true,
        in_development: false,
    },
    StandaloneFlag {
        key: "ai.semantic_search",
        enabled: false,
        category: "ai",
        description: "Semantic search over the knowledge base",
        dependencies: &[],
        requires_restart: true,
        is_experimental: false,
        in_development: false,
    },
    StandaloneFlag {
        key: "automation.workflows",
        enabled: false,
        category: "automation",
        description: "Rule-based campaign automation",
        dependencies: &["scheduling.meta.enabled"],
        requires_restart: false,
        is_experimental: false,
        in_development: true,
    },
];

fn platform_category(feature: &str) -> &'static str {
    match feature {
        "scheduling" => "automation",
        "paid_campaigns" => "integrations",
        "analytics" => "analytics",
        _ => "core",
    }
}

fn platform_dependencies(feature: &str, platform: &str) -> Vec<String> {
    match feature {
        "paid_campaigns" if platform != PRIMARY_AD_PLATFORM => {
            vec![platform_flag_key("paid_campaigns", PRIMARY_AD_PLATFORM)]
        }
        "scheduling" => vec![platform_flag_key("organic_posts", platform)],
        _ => Vec::new(),
    }
}

/// Every flag the seeder writes, in a stable order.
///
/// Only Meta organic posting, scheduling and analytics start enabled; paid
/// campaigns start disabled everywhere.
#[must_use]
pub fn flag_catalog() -> Vec<FlagSeed> {
    let mut flags = Vec::new();

    for feature in PLATFORM_FEATURES {
        for platform in PLATFORMS {
            let enabled = platform == PRIMARY_AD_PLATFORM && feature != "paid_campaigns";
            flags.push(FlagSeed {
                key: platform_flag_key(feature, platform),
                enabled,
                metadata: FlagMetadata {
                    category: platform_category(feature).to_string(),
                    description: format!("{} on {platform}", feature.replace('_', " ")),
                    dependencies: platform_dependencies(feature, platform),
                    requires_restart: false,
                    is_experimental: platform == "snapchat",
                    in_development: feature == "analytics" && platform == "twitter",
                },
            });
        }
    }

    flags.extend(STANDALONE.iter().map(|flag| FlagSeed {
        key: flag.key.to_string(),
        enabled: flag.enabled,
        metadata: FlagMetadata {
            category: flag.category.to_string(),
            description: flag.description.to_string(),
            dependencies: flag.dependencies.iter().map(|d| (*d).to_string()).collect(),
            requires_restart: flag.requires_restart,
            is_experimental: flag.is_experimental,
            in_development: flag.in_development,
        },
    }));

    flags
}
