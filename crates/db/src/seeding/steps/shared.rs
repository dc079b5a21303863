//! Cross-tenant configuration: marketplace apps, feature flags, per-org app
//! enablement and platform connections.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter, Set};

use cmis_core::catalog::{
    MARKETPLACE_APPS, PLATFORM_CONNECTIONS, connection_discriminator, flag_catalog,
    platform_scopes,
};
use cmis_core::feature_flag::ScopeType;
use cmis_core::identity::{IdentityRegistry, ORGANIZATIONS};
use cmis_core::seeding::{EntityKind, SeedError, StepManifest, StepSummary};

use crate::entities::{feature_flags, marketplace_apps, org_marketplace_apps, platform_connections};
use crate::seeding::context::SeedContext;
use crate::seeding::step::{SeedStep, db_error};
use crate::upsert::{key_eq, upsert_by, upsert_by_with};

/// Id of a platform connection row inserted by the seeder.
#[must_use]
pub fn platform_connection_id(org: &str, platform: &str) -> uuid::Uuid {
    IdentityRegistry::derive(
        "platform-connection",
        &connection_discriminator(org, platform),
    )
}

/// Marketplace application catalog, keyed by slug.
pub struct MarketplaceAppsStep;

#[async_trait]
impl SeedStep for MarketplaceAppsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("marketplace_apps", &[EntityKind::MarketplaceApp])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut summary = StepSummary::default();

        for app in MARKETPLACE_APPS {
            let row = marketplace_apps::ActiveModel {
                id: Set(IdentityRegistry::derive("marketplace-app", app.slug)),
                slug: Set(app.slug.to_string()),
                name: Set(app.name.to_string()),
                category: Set(app.category.to_string()),
                description: Set(app.description.to_string()),
                is_core: Set(app.is_core),
                is_premium: Set(app.is_premium),
                created_at: Set(now),
                updated_at: Set(now),
            };
            summary += upsert_by(
                txn,
                key_eq(marketplace_apps::Column::Slug, app.slug),
                row,
                &[
                    marketplace_apps::Column::Id,
                    marketplace_apps::Column::CreatedAt,
                ],
            )
            .await
            .map_err(|e| db_error(step, e))?
            .into();
        }

        Ok(summary)
    }
}

/// System-scope feature flags.
///
/// Re-runs refresh metadata only. The stored value and version belong to
/// whoever last toggled the flag.
pub struct FeatureFlagsStep;

#[async_trait]
impl SeedStep for FeatureFlagsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("feature_flags", &[EntityKind::FeatureFlag])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut summary = StepSummary::default();

        for flag in flag_catalog() {
            let metadata = serde_json::to_value(&flag.metadata).map_err(|e| SeedError::Database {
                step: step.to_string(),
                message: e.to_string(),
            })?;
            let row = feature_flags::ActiveModel {
                id: Set(IdentityRegistry::derive("feature-flag", &flag.key)),
                feature_key: Set(flag.key.clone()),
                scope_type: Set(ScopeType::System.as_str().to_string()),
                scope_id: Set(None),
                value: Set(flag.enabled),
                metadata: Set(metadata),
                version: Set(1),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let key = Condition::all()
                .add(feature_flags::Column::FeatureKey.eq(flag.key.as_str()))
                .add(feature_flags::Column::ScopeType.eq(ScopeType::System.as_str()))
                .add(feature_flags::Column::ScopeId.is_null());

            let outcome = upsert_by_with(txn, key, row, |existing, row| {
                row.id = Set(existing.id);
                row.value = Set(existing.value);
                row.version = Set(existing.version);
                row.created_at = Set(existing.created_at);
            })
            .await
            .map_err(|e| db_error(step, e))?;
            summary += outcome.into();
        }

        Ok(summary)
    }
}

/// Core marketplace apps enabled for every organization.
///
/// App ids are read back by slug: an app row may predate the seeder and
/// carry an id of its own.
pub struct OrgMarketplaceAppsStep;

#[async_trait]
impl SeedStep for OrgMarketplaceAppsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("org_marketplace_apps", &[EntityKind::OrgMarketplaceApp])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut summary = StepSummary::default();

        let core_slugs = MARKETPLACE_APPS
            .iter()
            .filter(|app| app.is_core)
            .map(|app| app.slug);
        let core_apps = marketplace_apps::Entity::find()
            .filter(marketplace_apps::Column::Slug.is_in(core_slugs))
            .all(txn)
            .await
            .map_err(|e| db_error(step, e))?;

        for org in ORGANIZATIONS {
            let org_id = ctx.org(step, org.name)?;
            for app in &core_apps {
                let row = org_marketplace_apps::ActiveModel {
                    org_id: Set(org_id),
                    app_id: Set(app.id),
                    is_enabled: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let key = key_eq(org_marketplace_apps::Column::OrgId, org_id)
                    .add(org_marketplace_apps::Column::AppId.eq(app.id));
                summary += upsert_by(
                    txn,
                    key,
                    row,
                    &[
                        org_marketplace_apps::Column::IsEnabled,
                        org_marketplace_apps::Column::CreatedAt,
                    ],
                )
                .await
                .map_err(|e| db_error(step, e))?
                .into();
            }
        }

        Ok(summary)
    }
}

/// Ad platform connections, keyed by organization and platform.
pub struct PlatformConnectionsStep;

#[async_trait]
impl SeedStep for PlatformConnectionsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("platform_connections", &[EntityKind::PlatformConnection])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut summary = StepSummary::default();

        for (org, platforms) in PLATFORM_CONNECTIONS {
            let org_id = ctx.org(step, org)?;
            for platform in *platforms {
                let row = platform_connections::ActiveModel {
                    id: Set(platform_connection_id(org, platform)),
                    org_id: Set(org_id),
                    platform: Set((*platform).to_string()),
                    account_name: Set(format!("{org} ({platform})")),
                    status: Set("active".to_string()),
                    scopes: Set(serde_json::json!(platform_scopes(platform))),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let key = key_eq(platform_connections::Column::OrgId, org_id)
                    .add(platform_connections::Column::Platform.eq(*platform));
                summary += upsert_by(
                    txn,
                    key,
                    row,
                    &[
                        platform_connections::Column::Id,
                        platform_connections::Column::CreatedAt,
                    ],
                )
                .await
                .map_err(|e| db_error(step, e))?
                .into();
            }
        }

        Ok(summary)
    }
}
