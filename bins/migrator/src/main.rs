//! Database migration runner for CMIS.
//!
//! Usage:
//!   migrator up      - Apply all pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - List applied and pending migrations
//!   migrator fresh   - Drop every table and re-apply all migrations
//!
//! The connection comes from `DATABASE_URL` (a `.env` file is honoured).

use cmis_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The migration CLI installs its own tracing subscriber.
    cli::run_cli(Migrator).await;
}
