//! Permission catalog and default role grants.

/// A permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionSeed {
    /// Permission code, `cmis.{category}.{action}`.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Category.
    pub category: &'static str,
    /// Description.
    pub description: &'static str,
    /// Destructive or credential-revealing action.
    pub is_dangerous: bool,
}

const fn p(
    code: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
) -> PermissionSeed {
    PermissionSeed {
        code,
        name,
        category,
        description,
        is_dangerous: false,
    }
}

const fn danger(
    code: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
) -> PermissionSeed {
    PermissionSeed {
        code,
        name,
        category,
        description,
        is_dangerous: true,
    }
}

/// Every permission, grouped by category.
pub const PERMISSIONS: &[PermissionSeed] = &[
    p("cmis.campaigns.view", "View Campaigns", "campaigns", "View campaign list and details"),
    p("cmis.campaigns.create", "Create Campaigns", "campaigns", "Create new campaigns"),
    p("cmis.campaigns.update", "Update Campaigns", "campaigns", "Update existing campaigns"),
    p("cmis.campaigns.delete", "Delete Campaigns", "campaigns", "Soft delete campaigns"),
    p("cmis.campaigns.restore", "Restore Campaigns", "campaigns", "Restore deleted campaigns"),
    danger("cmis.campaigns.force_delete", "Force Delete Campaigns", "campaigns", "Permanently delete campaigns"),
    p("cmis.campaigns.publish", "Publish Campaigns", "campaigns", "Publish campaigns to platforms"),
    p("cmis.campaigns.view_analytics", "View Campaign Analytics", "campaigns", "View campaign analytics and performance"),
    p("cmis.campaigns.duplicate", "Duplicate Campaigns", "campaigns", "Create campaign copies"),
    p("cmis.campaigns.export", "Export Campaigns", "campaigns", "Export campaign data"),
    p("cmis.assets.view", "View Assets", "assets", "View creative assets"),
    p("cmis.assets.create", "Create Assets", "assets", "Upload and create creative assets"),
    p("cmis.assets.update", "Update Assets", "assets", "Update existing assets"),
    p("cmis.assets.delete", "Delete Assets", "assets", "Delete creative assets"),
    p("cmis.assets.download", "Download Assets", "assets", "Download asset files"),
    p("cmis.assets.approve", "Approve Assets", "assets", "Approve assets for use"),
    p("cmis.assets.reject", "Reject Assets", "assets", "Reject submitted assets"),
    p("cmis.content.view", "View Content", "content", "View content plans and items"),
    p("cmis.content.create", "Create Content", "content", "Create content plans and items"),
    p("cmis.content.update", "Update Content", "content", "Update content plans and items"),
    p("cmis.content.delete", "Delete Content", "content", "Delete content plans and items"),
    p("cmis.content.approve", "Approve Content", "content", "Approve content for publishing"),
    p("cmis.content.schedule", "Schedule Content", "content", "Schedule content publishing"),
    p("cmis.integrations.view", "View Integrations", "integrations", "View platform integrations"),
    p("cmis.integrations.create", "Create Integrations", "integrations", "Connect new platform integrations"),
    p("cmis.integrations.update", "Update Integrations", "integrations", "Update integration settings"),
    danger("cmis.integrations.delete", "Delete Integrations", "integrations", "Remove platform integrations"),
    p("cmis.integrations.configure", "Configure Integrations", "integrations", "Configure integration settings"),
    p("cmis.integrations.sync", "Sync Integrations", "integrations", "Manually trigger integration sync"),
    danger("cmis.integrations.view_credentials", "View Integration Credentials", "integrations", "View integration API credentials"),
    p("cmis.analytics.view_dashboard", "View Analytics Dashboard", "analytics", "View analytics dashboard"),
    p("cmis.analytics.view_reports", "View Analytics Reports", "analytics", "View analytics reports"),
    p("cmis.analytics.create_report", "Create Analytics Reports", "analytics", "Create custom analytics reports"),
    p("cmis.analytics.export", "Export Analytics", "analytics", "Export analytics data to CSV/PDF"),
    p("cmis.analytics.view_insights", "View Analytics Insights", "analytics", "View AI-generated insights"),
    p("cmis.analytics.view_performance", "View Performance Metrics", "analytics", "View detailed performance metrics"),
    p("cmis.analytics.manage_dashboard", "Manage Analytics Dashboard", "analytics", "Customize analytics dashboard"),
    p("cmis.users.view", "View Users", "users", "View organization users"),
    p("cmis.users.create", "Create Users", "users", "Create new users"),
    p("cmis.users.invite", "Invite Users", "users", "Invite users to organization"),
    p("cmis.users.update", "Update Users", "users", "Update user information"),
    danger("cmis.users.delete", "Delete Users", "users", "Remove users from organization"),
    danger("cmis.users.assign_role", "Assign User Roles", "users", "Assign roles to users"),
    danger("cmis.users.grant_permission", "Grant User Permissions", "users", "Grant specific permissions to users"),
    p("cmis.users.view_activity", "View User Activity", "users", "View user activity logs"),
    p("cmis.organizations.view", "View Organization", "organizations", "View organization details"),
    p("cmis.organizations.update", "Update Organization", "organizations", "Update organization settings"),
    danger("cmis.organizations.delete", "Delete Organization", "organizations", "Delete organization"),
    p("cmis.organizations.manage_billing", "Manage Billing", "organizations", "Manage organization billing"),
    p("cmis.organizations.manage_settings", "Manage Settings", "organizations", "Manage organization settings"),
    p("cmis.ai.generate_content", "Generate AI Content", "ai", "Generate content using AI"),
    p("cmis.ai.generate_campaign", "Generate AI Campaigns", "ai", "Generate campaigns using AI"),
    p("cmis.ai.view_recommendations", "View AI Recommendations", "ai", "View AI-generated recommendations"),
    p("cmis.ai.semantic_search", "Use Semantic Search", "ai", "Use AI semantic search"),
    p("cmis.ai.manage_knowledge", "Manage AI Knowledge Base", "ai", "Manage AI knowledge base"),
    p("cmis.ai.manage_prompts", "Manage AI Prompts", "ai", "Manage AI prompt templates"),
    p("cmis.ai.view_insights", "View AI Insights", "ai", "View AI-generated insights"),
    p("cmis.channels.view", "View Channels", "channels", "View marketing channels"),
    p("cmis.channels.create", "Create Channels", "channels", "Create new channels"),
    p("cmis.channels.update", "Update Channels", "channels", "Update channel settings"),
    p("cmis.channels.delete", "Delete Channels", "channels", "Delete channels"),
    p("cmis.offerings.view", "View Offerings", "offerings", "View product offerings"),
    p("cmis.offerings.create", "Create Offerings", "offerings", "Create new offerings"),
    p("cmis.offerings.update", "Update Offerings", "offerings", "Update offering details"),
    p("cmis.offerings.delete", "Delete Offerings", "offerings", "Delete offerings"),
];

/// Codes the admin role lacks compared to the owner.
const ADMIN_EXCLUDED: &[&str] = &[
    "cmis.campaigns.force_delete",
    "cmis.integrations.delete",
    "cmis.integrations.view_credentials",
    "cmis.users.create",
    "cmis.users.delete",
    "cmis.users.grant_permission",
    "cmis.organizations.delete",
    "cmis.organizations.manage_billing",
    "cmis.ai.manage_knowledge",
    "cmis.ai.manage_prompts",
];

const MANAGER: &[&str] = &[
    "cmis.campaigns.view",
    "cmis.campaigns.create",
    "cmis.campaigns.update",
    "cmis.campaigns.delete",
    "cmis.campaigns.publish",
    "cmis.campaigns.view_analytics",
    "cmis.campaigns.duplicate",
    "cmis.campaigns.export",
    "cmis.assets.view",
    "cmis.assets.create",
    "cmis.assets.update",
    "cmis.assets.delete",
    "cmis.assets.download",
    "cmis.assets.approve",
    "cmis.content.view",
    "cmis.content.create",
    "cmis.content.update",
    "cmis.content.delete",
    "cmis.content.approve",
    "cmis.content.schedule",
    "cmis.integrations.view",
    "cmis.integrations.sync",
    "cmis.analytics.view_dashboard",
    "cmis.analytics.view_reports",
    "cmis.analytics.create_report",
    "cmis.analytics.export",
    "cmis.analytics.view_insights",
    "cmis.analytics.view_performance",
    "cmis.users.view",
    "cmis.organizations.view",
    "cmis.ai.generate_content",
    "cmis.ai.generate_campaign",
    "cmis.ai.view_recommendations",
    "cmis.ai.semantic_search",
    "cmis.ai.view_insights",
    "cmis.channels.view",
    "cmis.channels.create",
    "cmis.channels.update",
    "cmis.offerings.view",
    "cmis.offerings.create",
    "cmis.offerings.update",
];

const EDITOR: &[&str] = &[
    "cmis.campaigns.view",
    "cmis.campaigns.create",
    "cmis.campaigns.update",
    "cmis.campaigns.view_analytics",
    "cmis.assets.view",
    "cmis.assets.create",
    "cmis.assets.update",
    "cmis.assets.download",
    "cmis.content.view",
    "cmis.content.create",
    "cmis.content.update",
    "cmis.integrations.view",
    "cmis.analytics.view_dashboard",
    "cmis.analytics.view_reports",
    "cmis.users.view",
    "cmis.organizations.view",
    "cmis.ai.generate_content",
    "cmis.ai.view_recommendations",
    "cmis.ai.semantic_search",
    "cmis.channels.view",
    "cmis.offerings.view",
];

const VIEWER: &[&str] = &[
    "cmis.campaigns.view",
    "cmis.campaigns.view_analytics",
    "cmis.assets.view",
    "cmis.assets.download",
    "cmis.content.view",
    "cmis.integrations.view",
    "cmis.analytics.view_dashboard",
    "cmis.analytics.view_reports",
    "cmis.analytics.view_insights",
    "cmis.users.view",
    "cmis.organizations.view",
    "cmis.ai.view_recommendations",
    "cmis.ai.semantic_search",
    "cmis.ai.view_insights",
    "cmis.channels.view",
    "cmis.offerings.view",
];

fn in_categories(categories: &[&str], excluded_actions: &[&str]) -> Vec<&'static PermissionSeed> {
    PERMISSIONS
        .iter()
        .filter(|perm| categories.contains(&perm.category))
        .filter(|perm| !excluded_actions.iter().any(|action| perm.code.contains(action)))
        .collect()
}

fn listed(codes: &[&str]) -> Vec<&'static PermissionSeed> {
    PERMISSIONS
        .iter()
        .filter(|perm| codes.contains(&perm.code))
        .collect()
}

/// Permissions granted to `role_code`. Unknown roles get nothing.
#[must_use]
pub fn grants_for(role_code: &str) -> Vec<&'static PermissionSeed> {
    match role_code {
        "owner" => PERMISSIONS.iter().collect(),
        "admin" => PERMISSIONS
            .iter()
            .filter(|perm| !ADMIN_EXCLUDED.contains(&perm.code))
            .collect(),
        "manager" => listed(MANAGER),
        "editor" => listed(EDITOR),
        "viewer" => listed(VIEWER),
        "marketing_manager" => in_categories(&["campaigns", "assets", "content", "analytics"], &["delete"]),
        "content_creator" => in_categories(&["content", "assets"], &["delete", "publish", "approve"]),
        "social_manager" => in_categories(&["channels", "content"], &["delete"]),
        _ => Vec::new(),
    }
}
