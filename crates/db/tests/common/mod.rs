//! Shared helpers for integration tests: in-memory SQLite with migrations.

#![allow(dead_code)]

use cmis_core::identity::IdentityRegistry;
use cmis_core::seeding::RunReport;
use cmis_db::migration::{Migrator, MigratorTrait};
use cmis_db::{SeedContext, SeedOrchestrator, default_plan};
use cmis_shared::config::SeederConfig;
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};

/// Fresh in-memory database with the schema applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// Seeder configuration for tests.
pub fn seeder_config(include_demo: bool) -> SeederConfig {
    SeederConfig {
        include_demo,
        demo_password: "secret123".to_string(),
        fail_fast: false,
    }
}

/// Seed context built from the shipped constants.
pub fn context(config: SeederConfig) -> SeedContext {
    let registry = IdentityRegistry::from_constants().expect("Invalid identity constants");
    SeedContext::new(registry, config).expect("Failed to hash demo password")
}

/// Runs the standard plan.
pub async fn seed(db: &DatabaseConnection, include_demo: bool) -> RunReport {
    let config = seeder_config(include_demo);
    let ctx = context(config.clone());
    SeedOrchestrator::new(db, &ctx)
        .run(&default_plan(&config))
        .await
        .expect("Seed plan rejected")
}

/// Row count of an entity's table.
pub async fn count<E>(db: &DatabaseConnection, _entity: E) -> u64
where
    E: EntityTrait,
    E::Model: Sync,
{
    E::find()
        .count(db)
        .await
        .expect("Failed to count rows")
}
