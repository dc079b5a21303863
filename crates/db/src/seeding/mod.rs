//! Seed execution.
//!
//! Plans, manifests and reports are defined in `cmis_core::seeding`; this
//! module runs them. Each [`Stage`] commits in its own maintenance
//! transaction together with its `seed_runs` ledger row.
//!
//! # Usage
//!
//! ```ignore
//! let ctx = SeedContext::new(IdentityRegistry::from_constants()?, config.seeder.clone())?;
//! let plan = default_plan(&config.seeder);
//! let report = SeedOrchestrator::new(&db, &ctx).run(&plan).await?;
//! ```

pub mod context;
pub mod ledger;
pub mod orchestrator;
pub mod plan;
pub mod step;
pub mod steps;

pub use context::SeedContext;
pub use orchestrator::SeedOrchestrator;
pub use plan::{default_plan, demo_stages};
pub use step::{SeedStep, Stage, db_error, insert_all};
