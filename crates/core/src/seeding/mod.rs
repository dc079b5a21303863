//! Dependency-ordered seed plans.
//!
//! Pure planning logic for the seed orchestrator: the entity dependency graph,
//! stage and step manifests, plan validation, and run reports. Execution
//! against a database lives in `cmis-db`.
//!
//! # Modules
//!
//! - `graph` - Static dependency graph over entity kinds
//! - `plan` - Stage/step manifests and validation
//! - `report` - Step summaries and run reports
//! - `error` - Plan and seed error types

pub mod error;
pub mod graph;
pub mod plan;
pub mod report;

#[cfg(test)]
mod plan_props;

pub use error::{PlanError, SeedError};
pub use graph::{EntityKind, dependents_closure, truncation_order};
pub use plan::{
    RunPolicy, StageDecision, StageManifest, StagePolicy, StepManifest, next_batch,
    validate_plan, validate_plan_with,
};
pub use report::{RunReport, StageOutcome, StageReport, StepSummary};
