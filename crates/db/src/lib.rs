//! Database layer for CMIS.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Database migrations, including tenant row-level security on `PostgreSQL`
//! - Maintenance-mode and tenant-scoped transactions, natural-key upserts
//! - The seed orchestrator and the standard seed plan
//! - Repositories used by the admin API

#[allow(missing_docs)]
pub mod entities;
pub mod maintenance;
pub mod migration;
pub mod repositories;
pub mod seeding;
pub mod tenant;
pub mod upsert;

pub use maintenance::{MaintenanceExt, MaintenanceTransaction};
pub use repositories::FeatureFlagRepository;
pub use seeding::{SeedContext, SeedOrchestrator, Stage, default_plan};
pub use tenant::{TenantExt, TenantTransaction};

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

use cmis_shared::config::DatabaseConfig;

/// Establishes a connection pool.
///
/// On `PostgreSQL` the configured `search_path` is applied to every pooled
/// connection.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if is_postgres(&config.url) {
        if let Some(search_path) = &config.search_path {
            options.set_schema_search_path(search_path.clone());
        }
    }

    let db = Database::connect(options).await?;
    info!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

fn is_postgres(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}
