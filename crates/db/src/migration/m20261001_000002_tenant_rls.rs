//! Row-level security on tenant tables.
//!
//! PostgreSQL only; other backends skip this migration. Rows are visible when
//! they belong to `app.current_org_id` or when the transaction runs in
//! maintenance mode (`app.is_admin = 'true'`, see [`crate::maintenance`]).

use sea_orm::DbBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Tables holding tenant rows, with the column naming the owning org.
const TENANT_TABLES: &[(&str, &str)] = &[
    ("orgs", "id"),
    ("user_orgs", "org_id"),
    ("org_marketplace_apps", "org_id"),
    ("platform_connections", "org_id"),
    ("offerings", "org_id"),
    ("segments", "org_id"),
    ("integrations", "org_id"),
    ("social_accounts", "org_id"),
    ("social_posts", "org_id"),
    ("campaigns", "org_id"),
    ("creative_assets", "org_id"),
    ("content_plans", "org_id"),
    ("scheduled_posts", "org_id"),
    ("ad_accounts", "org_id"),
    ("ad_campaigns", "org_id"),
];

fn enable_sql() -> String {
    TENANT_TABLES
        .iter()
        .map(|(table, column)| {
            format!(
                "ALTER TABLE {table} ENABLE ROW LEVEL SECURITY;\n\
                 ALTER TABLE {table} FORCE ROW LEVEL SECURITY;\n\
                 CREATE POLICY tenant_isolation ON {table}\n    \
                 USING ({column} = NULLIF(current_setting('app.current_org_id', true), '')::UUID\n        \
                 OR current_setting('app.is_admin', true) = 'true');\n"
            )
        })
        .collect()
}

fn disable_sql() -> String {
    TENANT_TABLES
        .iter()
        .map(|(table, _)| {
            format!(
                "DROP POLICY IF EXISTS tenant_isolation ON {table};\n\
                 ALTER TABLE {table} NO FORCE ROW LEVEL SECURITY;\n\
                 ALTER TABLE {table} DISABLE ROW LEVEL SECURITY;\n"
            )
        })
        .collect()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }
        manager
            .get_connection()
            .execute_unprepared(&enable_sql())
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }
        manager
            .get_connection()
            .execute_unprepared(&disable_sql())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tenant_table_gets_a_policy() {
        let sql = enable_sql();
        assert_eq!(
            sql.matches("CREATE POLICY tenant_isolation").count(),
            TENANT_TABLES.len()
        );
        assert!(sql.contains("ALTER TABLE campaigns FORCE ROW LEVEL SECURITY;"));
        assert!(sql.contains("USING (id = NULLIF"));
    }

    #[test]
    fn test_down_reverses_up() {
        let sql = disable_sql();
        assert_eq!(sql.matches("DROP POLICY IF EXISTS").count(), TENANT_TABLES.len());
    }
}
