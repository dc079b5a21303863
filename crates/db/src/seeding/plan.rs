//! The default seed plan.

use cmis_shared::config::SeederConfig;

use super::step::Stage;
use super::steps::{demo, identity, reference, shared};

/// Name of the reference data stage.
pub const REFERENCE_STAGE: &str = "reference";
/// Name of the identity stage.
pub const IDENTITY_STAGE: &str = "identity";

/// Builds the standard plan.
///
/// Required stages seed reference data, identity, access control and shared
/// configuration on every run. Demo stages are optional and run once; they
/// are left out entirely when `include_demo` is false.
#[must_use]
pub fn default_plan(config: &SeederConfig) -> Vec<Stage> {
    let mut stages = vec![
        Stage::required(REFERENCE_STAGE)
            .step(reference::ChannelsStep)
            .step(reference::MarketsStep)
            .step(reference::IndustriesStep)
            .step(reference::KpisStep),
        Stage::required(IDENTITY_STAGE)
            .step(identity::OrganizationsStep)
            .step(identity::UsersStep)
            .step(identity::RolesStep)
            .step(identity::PermissionsStep),
        Stage::required("access")
            .step(identity::RolePermissionsStep)
            .step(identity::MembershipsStep),
        Stage::required("marketplace")
            .step(shared::MarketplaceAppsStep)
            .step(shared::FeatureFlagsStep),
        Stage::required("org_config")
            .step(shared::OrgMarketplaceAppsStep)
            .step(shared::PlatformConnectionsStep),
    ];

    if config.include_demo {
        stages.extend(demo_stages());
    }

    stages
}

/// Optional run-once demo stages.
#[must_use]
pub fn demo_stages() -> Vec<Stage> {
    vec![
        Stage::optional("demo_catalog")
            .once()
            .step(demo::OfferingsStep)
            .step(demo::SegmentsStep)
            .step(demo::IntegrationsStep),
        Stage::optional("demo_accounts")
            .once()
            .step(demo::SocialAccountsStep)
            .step(demo::AdAccountsStep)
            .step(demo::CampaignsStep),
        Stage::optional("demo_content")
            .once()
            .step(demo::SocialPostsStep)
            .step(demo::CreativeAssetsStep)
            .step(demo::ContentPlansStep)
            .step(demo::ScheduledPostsStep)
            .step(demo::AdCampaignsStep),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmis_core::seeding::{StagePolicy, validate_plan};
    use rstest::rstest;
    use std::collections::HashSet;

    fn config(include_demo: bool) -> SeederConfig {
        SeederConfig {
            include_demo,
            ..SeederConfig::default()
        }
    }

    #[rstest]
    #[case(false, 5)]
    #[case(true, 8)]
    fn test_default_plan_is_valid(#[case] include_demo: bool, #[case] stages: usize) {
        let manifests: Vec<_> = default_plan(&config(include_demo))
            .iter()
            .map(Stage::manifest)
            .collect();
        assert_eq!(manifests.len(), stages);
        validate_plan(&manifests).unwrap();
    }

    #[test]
    fn test_demo_stages_are_optional_and_last() {
        let plan = default_plan(&config(true));
        let first_optional = plan
            .iter()
            .position(|s| s.policy == StagePolicy::Optional)
            .unwrap();
        assert!(plan[first_optional..]
            .iter()
            .all(|s| s.policy == StagePolicy::Optional));
        assert_eq!(default_plan(&config(false)).len(), first_optional);
    }

    #[test]
    fn test_step_names_unique() {
        let plan = default_plan(&config(true));
        let names: Vec<_> = plan
            .iter()
            .flat_map(|s| s.steps.iter().map(|step| step.manifest().name))
            .collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }
}
