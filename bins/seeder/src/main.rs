//! Database seeder for CMIS.
//!
//! Applies pending migrations, then runs the seed plan: reference data,
//! identity, access grants, marketplace and per-organization configuration,
//! followed by demo content when `seeder.include_demo` is set.
//!
//! Exit status is 0 when every required stage committed, 2 when the plan is
//! malformed, and 1 for any other failure, including plans that seed a row
//! before its parent.
//!
//! Usage: cargo run --bin seeder

use std::process::ExitCode;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cmis_core::identity::IdentityRegistry;
use cmis_core::seeding::{RunReport, SeedError};
use cmis_db::migration::Migrator;
use cmis_db::{SeedContext, SeedOrchestrator, connect, default_plan};
use cmis_shared::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cmis=debug,sea_orm_migration=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(report) => {
            print!("{report}");
            for (stage, err) in report.warnings() {
                warn!(stage, error = %err, "Optional stage failed");
            }
            match report.required_failure() {
                None => {
                    info!(batch = report.batch, "Seeding complete");
                    ExitCode::SUCCESS
                }
                Some((stage, err)) => {
                    error!(stage, step = err.step(), error = %err, "Seeding failed");
                    exit_code(err)
                }
            }
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Seeding aborted");
            e.downcast_ref::<SeedError>()
                .map_or(ExitCode::FAILURE, exit_code)
        }
    }
}

async fn run() -> anyhow::Result<RunReport> {
    let config = AppConfig::load_with_database_url_fallback().context("loading configuration")?;

    let db = connect(&config.database)
        .await
        .context("connecting to database")?;
    info!("Connected to database");

    Migrator::up(&db, None)
        .await
        .context("applying migrations")?;

    let registry = IdentityRegistry::from_constants()?;
    let ctx = SeedContext::new(registry, config.seeder.clone())?;
    let plan = default_plan(&config.seeder);
    info!(
        stages = plan.len(),
        include_demo = config.seeder.include_demo,
        fail_fast = config.seeder.fail_fast,
        "Running seed plan"
    );

    let report = SeedOrchestrator::new(&db, &ctx).run(&plan).await?;
    Ok(report)
}

fn exit_code(err: &SeedError) -> ExitCode {
    u8::try_from(err.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}
