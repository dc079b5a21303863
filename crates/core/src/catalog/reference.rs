//! Domain-invariant lookup data: channels, channel formats, markets,
//! industries and KPIs.

/// A channel format (placement and creative shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSeed {
    /// Format code, unique within its channel.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Aspect ratio such as `9:16`.
    pub ratio: &'static str,
    /// Maximum video length in seconds, for video formats.
    pub max_duration_secs: Option<i32>,
}

/// A marketing channel and its formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSeed {
    /// Channel code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// `social`, `search`, `display` or `email`.
    pub kind: &'static str,
    /// Formats offered by the channel.
    pub formats: &'static [FormatSeed],
}

/// A geographic market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketSeed {
    /// ISO 3166 country code.
    pub code: &'static str,
    /// English name.
    pub name: &'static str,
    /// Arabic name.
    pub name_ar: &'static str,
    /// ISO 4217 currency.
    pub currency: &'static str,
    /// Primary language.
    pub language: &'static str,
}

/// An industry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndustrySeed {
    /// Industry code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// A KPI definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiSeed {
    /// KPI code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// `count`, `percent`, `currency` or `ratio`.
    pub unit: &'static str,
    /// True if larger values are better.
    pub higher_is_better: bool,
}

const fn format(code: &'static str, name: &'static str, ratio: &'static str) -> FormatSeed {
    FormatSeed {
        code,
        name,
        ratio,
        max_duration_secs: None,
    }
}

const fn video(
    code: &'static str,
    name: &'static str,
    ratio: &'static str,
    max_duration_secs: i32,
) -> FormatSeed {
    FormatSeed {
        code,
        name,
        ratio,
        max_duration_secs: Some(max_duration_secs),
    }
}

/// Channels.
pub const CHANNELS: &[ChannelSeed] = &[
    ChannelSeed {
        code: "facebook",
        name: "Facebook",
        kind: "social",
        formats: &[
            format("feed_image", "Feed Image", "1:1"),
            video("feed_video", "Feed Video", "4:5", 240),
            video("story", "Story", "9:16", 60),
            video("reel", "Reel", "9:16", 90),
        ],
    },
    ChannelSeed {
        code: "instagram",
        name: "Instagram",
        kind: "social",
        formats: &[
            format("feed_image", "Feed Image", "1:1"),
            format("carousel", "Carousel", "1:1"),
            video("story", "Story", "9:16", 60),
            video("reel", "Reel", "9:16", 90),
        ],
    },
    ChannelSeed {
        code: "tiktok",
        name: "TikTok",
        kind: "social",
        formats: &[video("in_feed", "In-Feed Video", "9:16", 600)],
    },
    ChannelSeed {
        code: "linkedin",
        name: "LinkedIn",
        kind: "social",
        formats: &[
            format("single_image", "Single Image", "1.91:1"),
            video("video", "Video", "16:9", 600),
        ],
    },
    ChannelSeed {
        code: "twitter",
        name: "X (Twitter)",
        kind: "social",
        formats: &[
            format("image", "Image Post", "16:9"),
            video("video", "Video Post", "16:9", 140),
        ],
    },
    ChannelSeed {
        code: "snapchat",
        name: "Snapchat",
        kind: "social",
        formats: &[video("snap_ad", "Snap Ad", "9:16", 180)],
    },
    ChannelSeed {
        code: "google_search",
        name: "Google Search",
        kind: "search",
        formats: &[format("responsive_search", "Responsive Search Ad", "n/a")],
    },
    ChannelSeed {
        code: "google_display",
        name: "Google Display",
        kind: "display",
        formats: &[
            format("leaderboard", "Leaderboard", "728:90"),
            format("medium_rectangle", "Medium Rectangle", "300:250"),
        ],
    },
    ChannelSeed {
        code: "youtube",
        name: "YouTube",
        kind: "social",
        formats: &[
            video("instream", "In-Stream", "16:9", 180),
            video("shorts", "Shorts", "9:16", 60),
        ],
    },
    ChannelSeed {
        code: "email",
        name: "Email",
        kind: "email",
        formats: &[format("newsletter", "Newsletter", "n/a")],
    },
];

/// Markets.
pub const MARKETS: &[MarketSeed] = &[
    MarketSeed { code: "SA", name: "Saudi Arabia", name_ar: "السعودية", currency: "SAR", language: "ar" },
    MarketSeed { code: "AE", name: "United Arab Emirates", name_ar: "الإمارات", currency: "AED", language: "ar" },
    MarketSeed { code: "EG", name: "Egypt", name_ar: "مصر", currency: "EGP", language: "ar" },
    MarketSeed { code: "KW", name: "Kuwait", name_ar: "الكويت", currency: "KWD", language: "ar" },
    MarketSeed { code: "QA", name: "Qatar", name_ar: "قطر", currency: "QAR", language: "ar" },
    MarketSeed { code: "BH", name: "Bahrain", name_ar: "البحرين", currency: "BHD", language: "ar" },
    MarketSeed { code: "US", name: "United States", name_ar: "الولايات المتحدة", currency: "USD", language: "en" },
    MarketSeed { code: "GB", name: "United Kingdom", name_ar: "المملكة المتحدة", currency: "GBP", language: "en" },
    MarketSeed { code: "FR", name: "France", name_ar: "فرنسا", currency: "EUR", language: "fr" },
    MarketSeed { code: "DE", name: "Germany", name_ar: "ألمانيا", currency: "EUR", language: "de" },
];

/// Industries.
pub const INDUSTRIES: &[IndustrySeed] = &[
    IndustrySeed { code: "technology", name: "Technology" },
    IndustrySeed { code: "marketing", name: "Marketing & Advertising" },
    IndustrySeed { code: "fashion", name: "Fashion & Apparel" },
    IndustrySeed { code: "healthcare", name: "Healthcare" },
    IndustrySeed { code: "retail", name: "Retail & E-commerce" },
    IndustrySeed { code: "finance", name: "Financial Services" },
    IndustrySeed { code: "education", name: "Education" },
    IndustrySeed { code: "real_estate", name: "Real Estate" },
    IndustrySeed { code: "hospitality", name: "Hospitality & Travel" },
    IndustrySeed { code: "automotive", name: "Automotive" },
];

/// KPIs.
pub const KPIS: &[KpiSeed] = &[
    KpiSeed { code: "impressions", name: "Impressions", unit: "count", higher_is_better: true },
    KpiSeed { code: "reach", name: "Reach", unit: "count", higher_is_better: true },
    KpiSeed { code: "clicks", name: "Clicks", unit: "count", higher_is_better: true },
    KpiSeed { code: "ctr", name: "Click-Through Rate", unit: "percent", higher_is_better: true },
    KpiSeed { code: "cpc", name: "Cost per Click", unit: "currency", higher_is_better: false },
    KpiSeed { code: "cpm", name: "Cost per Mille", unit: "currency", higher_is_better: false },
    KpiSeed { code: "conversions", name: "Conversions", unit: "count", higher_is_better: true },
    KpiSeed { code: "conversion_rate", name: "Conversion Rate", unit: "percent", higher_is_better: true },
    KpiSeed { code: "cpa", name: "Cost per Acquisition", unit: "currency", higher_is_better: false },
    KpiSeed { code: "roas", name: "Return on Ad Spend", unit: "ratio", higher_is_better: true },
    KpiSeed { code: "engagement_rate", name: "Engagement Rate", unit: "percent", higher_is_better: true },
    KpiSeed { code: "follower_growth", name: "Follower Growth", unit: "count", higher_is_better: true },
];

/// Total number of channel format rows.
#[must_use]
pub fn format_count() -> usize {
    CHANNELS.iter().map(|c| c.formats.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        assert_eq!(
            CHANNELS.iter().map(|c| c.code).collect::<HashSet<_>>().len(),
            CHANNELS.len()
        );
        assert_eq!(
            MARKETS.iter().map(|m| m.code).collect::<HashSet<_>>().len(),
            MARKETS.len()
        );
        assert_eq!(
            INDUSTRIES.iter().map(|i| i.code).collect::<HashSet<_>>().len(),
            INDUSTRIES.len()
        );
        assert_eq!(
            KPIS.iter().map(|k| k.code).collect::<HashSet<_>>().len(),
            KPIS.len()
        );
    }

    #[test]
    fn test_format_codes_unique_per_channel() {
        for channel in CHANNELS {
            let codes: HashSet<_> = channel.formats.iter().map(|f| f.code).collect();
            assert_eq!(codes.len(), channel.formats.len(), "{}", channel.code);
            assert!(!channel.formats.is_empty());
        }
        assert_eq!(format_count(), 20);
    }

    #[test]
    fn test_demo_org_industries_exist() {
        for org in crate::identity::ORGANIZATIONS {
            assert!(INDUSTRIES.iter().any(|i| i.code == org.industry));
        }
    }
}
