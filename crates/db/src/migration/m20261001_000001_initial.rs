//! Initial schema.
//!
//! Tables are generated from the entity definitions so the same migration
//! runs on PostgreSQL and on the in-memory SQLite databases used by tests.
//! Foreign keys come from each entity's `belongs_to` relations; tables are
//! created parents first. On PostgreSQL every foreign key is then made
//! `DEFERRABLE INITIALLY IMMEDIATE` so maintenance transactions can defer
//! them to commit.

use sea_orm::{DbBackend, EntityName, EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entities::{
    ad_accounts, ad_campaigns, campaigns, channel_formats, channels, content_plans,
    creative_assets, feature_flag_overrides, feature_flags, industries, integrations, kpis,
    marketplace_apps, markets, offerings, org_marketplace_apps, orgs, permissions,
    platform_connections, role_permissions, roles, scheduled_posts, seed_runs, segments,
    social_accounts, social_posts, user_orgs, users,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // ============================================================
        // PART 1: TABLES (parents first)
        // ============================================================
        for mut table in tables(&schema) {
            manager.create_table(table.if_not_exists().to_owned()).await?;
        }

        // ============================================================
        // PART 2: NATURAL KEYS AND LOOKUP INDEXES
        // ============================================================
        for index in indexes() {
            manager.create_index(index).await?;
        }
        // NULL scope ids never collide in `uq_feature_flags_scope`.
        manager
            .get_connection()
            .execute_unprepared(SYSTEM_FLAG_INDEX_SQL)
            .await?;

        // ============================================================
        // PART 3: DEFERRABLE FOREIGN KEYS (PostgreSQL)
        // ============================================================
        if manager.get_database_backend() == DbBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(&deferrable_foreign_keys_sql(&table_names()))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in table_names().into_iter().rev() {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

/// One system row per flag key.
const SYSTEM_FLAG_INDEX_SQL: &str = "CREATE UNIQUE INDEX IF NOT EXISTS uq_feature_flags_system_key \
     ON feature_flags (feature_key) WHERE scope_type = 'system'";

/// Marks every foreign key declared on `tables` deferrable.
///
/// Constraints keep immediate checking by default; only
/// `SET CONSTRAINTS ALL DEFERRED` postpones them.
fn deferrable_foreign_keys_sql(tables: &[String]) -> String {
    let names = tables
        .iter()
        .map(|table| format!("'{table}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "DO $$\n\
         DECLARE fk RECORD;\n\
         BEGIN\n    \
             FOR fk IN\n        \
                 SELECT c.conname, c.conrelid::regclass AS tbl\n        \
                 FROM pg_constraint c\n        \
                 JOIN pg_class t ON t.oid = c.conrelid\n        \
                 JOIN pg_namespace n ON n.oid = t.relnamespace\n        \
                 WHERE c.contype = 'f'\n          \
                   AND NOT c.condeferrable\n          \
                   AND n.nspname = ANY (current_schemas(false))\n          \
                   AND t.relname = ANY (ARRAY[{names}])\n    \
             LOOP\n        \
                 EXECUTE format('ALTER TABLE %s ALTER CONSTRAINT %I DEFERRABLE INITIALLY IMMEDIATE', fk.tbl, fk.conname);\n    \
             END LOOP;\n\
         END $$;"
    )
}

fn create<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    schema.create_table_from_entity(entity)
}

fn tables(schema: &Schema) -> Vec<TableCreateStatement> {
    vec![
        // Reference data
        create(schema, channels::Entity),
        create(schema, channel_formats::Entity),
        create(schema, markets::Entity),
        create(schema, industries::Entity),
        create(schema, kpis::Entity),
        // Identity
        create(schema, orgs::Entity),
        create(schema, users::Entity),
        create(schema, roles::Entity),
        create(schema, permissions::Entity),
        create(schema, role_permissions::Entity),
        create(schema, user_orgs::Entity),
        // Shared configuration
        create(schema, marketplace_apps::Entity),
        create(schema, org_marketplace_apps::Entity),
        create(schema, platform_connections::Entity),
        create(schema, feature_flags::Entity),
        create(schema, feature_flag_overrides::Entity),
        // Demo content
        create(schema, offerings::Entity),
        create(schema, segments::Entity),
        create(schema, integrations::Entity),
        create(schema, social_accounts::Entity),
        create(schema, social_posts::Entity),
        create(schema, campaigns::Entity),
        create(schema, creative_assets::Entity),
        create(schema, content_plans::Entity),
        create(schema, scheduled_posts::Entity),
        create(schema, ad_accounts::Entity),
        create(schema, ad_campaigns::Entity),
        // Seed ledger
        create(schema, seed_runs::Entity),
    ]
}

fn table_names() -> Vec<String> {
    vec![
        channels::Entity.table_name().to_owned(),
        channel_formats::Entity.table_name().to_owned(),
        markets::Entity.table_name().to_owned(),
        industries::Entity.table_name().to_owned(),
        kpis::Entity.table_name().to_owned(),
        orgs::Entity.table_name().to_owned(),
        users::Entity.table_name().to_owned(),
        roles::Entity.table_name().to_owned(),
        permissions::Entity.table_name().to_owned(),
        role_permissions::Entity.table_name().to_owned(),
        user_orgs::Entity.table_name().to_owned(),
        marketplace_apps::Entity.table_name().to_owned(),
        org_marketplace_apps::Entity.table_name().to_owned(),
        platform_connections::Entity.table_name().to_owned(),
        feature_flags::Entity.table_name().to_owned(),
        feature_flag_overrides::Entity.table_name().to_owned(),
        offerings::Entity.table_name().to_owned(),
        segments::Entity.table_name().to_owned(),
        integrations::Entity.table_name().to_owned(),
        social_accounts::Entity.table_name().to_owned(),
        social_posts::Entity.table_name().to_owned(),
        campaigns::Entity.table_name().to_owned(),
        creative_assets::Entity.table_name().to_owned(),
        content_plans::Entity.table_name().to_owned(),
        scheduled_posts::Entity.table_name().to_owned(),
        ad_accounts::Entity.table_name().to_owned(),
        ad_campaigns::Entity.table_name().to_owned(),
        seed_runs::Entity.table_name().to_owned(),
    ]
}

fn indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("uq_channel_formats_channel_code")
            .table(channel_formats::Entity)
            .col(channel_formats::Column::ChannelId)
            .col(channel_formats::Column::Code)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_platform_connections_org_platform")
            .table(platform_connections::Entity)
            .col(platform_connections::Column::OrgId)
            .col(platform_connections::Column::Platform)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_feature_flags_scope")
            .table(feature_flags::Entity)
            .col(feature_flags::Column::FeatureKey)
            .col(feature_flags::Column::ScopeType)
            .col(feature_flags::Column::ScopeId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_feature_flag_overrides_target")
            .table(feature_flag_overrides::Entity)
            .col(feature_flag_overrides::Column::FeatureFlagId)
            .col(feature_flag_overrides::Column::TargetType)
            .col(feature_flag_overrides::Column::TargetId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_offerings_org_name")
            .table(offerings::Entity)
            .col(offerings::Column::OrgId)
            .col(offerings::Column::Name)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_campaigns_org_name")
            .table(campaigns::Entity)
            .col(campaigns::Column::OrgId)
            .col(campaigns::Column::Name)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_social_accounts_org_username")
            .table(social_accounts::Entity)
            .col(social_accounts::Column::OrgId)
            .col(social_accounts::Column::Username)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_seed_runs_name_batch")
            .table(seed_runs::Entity)
            .col(seed_runs::Column::Name)
            .col(seed_runs::Column::Batch)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}
