//! Fixed identifiers for well-known seeded entities.
//!
//! These tables are the single source of truth every seeder reads. Rows keep
//! their ids forever; add new rows instead of renumbering.

use uuid::Uuid;

/// TechVision Solutions (technology, USD).
pub const TECHVISION_ORG_ID: Uuid = Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0001);
/// Arabic Marketing Company (marketing, SAR).
pub const ARABIC_MARKETING_ORG_ID: Uuid =
    Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0002);
/// FashionHub Retail (fashion, EUR).
pub const FASHIONHUB_ORG_ID: Uuid = Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0003);
/// HealthWell Clinic (healthcare, AED).
pub const HEALTHWELL_ORG_ID: Uuid = Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0004);

/// System administrator present in every demo organization.
pub const ADMIN_USER_EMAIL: &str = "admin@cmis.test";

/// A seeded organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizationSeed {
    /// Registry key and display name.
    pub name: &'static str,
    /// Stable identifier.
    pub id: Uuid,
    /// Default UI locale.
    pub locale: &'static str,
    /// ISO 4217 currency.
    pub currency: &'static str,
    /// IANA timezone.
    pub timezone: &'static str,
    /// Industry code from the reference catalog.
    pub industry: &'static str,
}

/// A seeded role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSeed {
    /// Registry key and role code.
    pub code: &'static str,
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
}

/// A seeded user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSeed {
    /// Registry key and login email.
    pub email: &'static str,
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: &'static str,
    /// Preferred locale.
    pub locale: &'static str,
}

/// Demo organizations.
pub const ORGANIZATIONS: &[OrganizationSeed] = &[
    OrganizationSeed {
        name: "TechVision Solutions",
        id: TECHVISION_ORG_ID,
        locale: "en",
        currency: "USD",
        timezone: "America/New_York",
        industry: "technology",
    },
    OrganizationSeed {
        name: "الشركة العربية للتسويق",
        id: ARABIC_MARKETING_ORG_ID,
        locale: "ar",
        currency: "SAR",
        timezone: "Asia/Riyadh",
        industry: "marketing",
    },
    OrganizationSeed {
        name: "FashionHub Retail",
        id: FASHIONHUB_ORG_ID,
        locale: "en",
        currency: "EUR",
        timezone: "Europe/Paris",
        industry: "fashion",
    },
    OrganizationSeed {
        name: "HealthWell Clinic",
        id: HEALTHWELL_ORG_ID,
        locale: "ar",
        currency: "AED",
        timezone: "Asia/Dubai",
        industry: "healthcare",
    },
];

/// Roles. The first five are the platform's default roles; the last three
/// are marketing roles used by the demo memberships.
pub const ROLES: &[RoleSeed] = &[
    RoleSeed {
        code: "owner",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0101),
        name: "Owner",
        description: "Full access to everything",
    },
    RoleSeed {
        code: "admin",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0102),
        name: "Administrator",
        description: "Full access except organization deletion and dangerous operations",
    },
    RoleSeed {
        code: "manager",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0103),
        name: "Manager",
        description: "Manages campaigns and content, no user or integration management",
    },
    RoleSeed {
        code: "editor",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0104),
        name: "Editor",
        description: "Creates and edits content",
    },
    RoleSeed {
        code: "viewer",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0105),
        name: "Viewer",
        description: "Read-only access",
    },
    RoleSeed {
        code: "marketing_manager",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0106),
        name: "Marketing Manager",
        description: "Runs campaigns, creative, content, social and analytics",
    },
    RoleSeed {
        code: "content_creator",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0107),
        name: "Content Creator",
        description: "Drafts content and creative without publishing",
    },
    RoleSeed {
        code: "social_manager",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0108),
        name: "Social Media Manager",
        description: "Manages social media accounts and posts",
    },
];

/// Demo users.
pub const USERS: &[UserSeed] = &[
    UserSeed {
        email: ADMIN_USER_EMAIL,
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0201),
        name: "System Admin",
        locale: "en",
    },
    UserSeed {
        email: "sarah@techvision.com",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0202),
        name: "Sarah Johnson",
        locale: "en",
    },
    UserSeed {
        email: "maria@techvision.com",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0203),
        name: "Maria Garcia",
        locale: "en",
    },
    UserSeed {
        email: "mohamed@arabic-marketing.com",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0204),
        name: "محمد أحمد",
        locale: "ar",
    },
    UserSeed {
        email: "ahmed@arabic-marketing.com",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0205),
        name: "أحمد علي",
        locale: "ar",
    },
    UserSeed {
        email: "emma@fashionhub.com",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0206),
        name: "Emma Williams",
        locale: "en",
    },
    UserSeed {
        email: "david@healthwell.com",
        id: Uuid::from_u128(0x5d0c_2a10_0000_4000_8000_0000_0000_0207),
        name: "David Chen",
        locale: "en",
    },
];

/// Demo memberships as `(user email, organization name, role code)`.
pub const MEMBERSHIPS: &[(&str, &str, &str)] = &[
    (ADMIN_USER_EMAIL, "TechVision Solutions", "owner"),
    (ADMIN_USER_EMAIL, "الشركة العربية للتسويق", "owner"),
    (ADMIN_USER_EMAIL, "FashionHub Retail", "owner"),
    (ADMIN_USER_EMAIL, "HealthWell Clinic", "owner"),
    ("sarah@techvision.com", "TechVision Solutions", "marketing_manager"),
    ("maria@techvision.com", "TechVision Solutions", "content_creator"),
    ("mohamed@arabic-marketing.com", "الشركة العربية للتسويق", "marketing_manager"),
    ("ahmed@arabic-marketing.com", "الشركة العربية للتسويق", "social_manager"),
    ("emma@fashionhub.com", "FashionHub Retail", "social_manager"),
    ("david@healthwell.com", "HealthWell Clinic", "marketing_manager"),
];
