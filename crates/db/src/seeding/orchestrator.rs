//! Stage-by-stage seed execution.

use std::collections::BTreeSet;

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction};
use tracing::{debug, error, info, warn};

use cmis_core::seeding::{
    EntityKind, RunReport, SeedError, StageDecision, StageOutcome, StagePolicy, StageReport,
    StepSummary, next_batch, truncation_order, validate_plan_with,
};

use super::context::SeedContext;
use super::ledger;
use super::step::{Stage, db_error};
use crate::maintenance::MaintenanceTransaction;

const LEDGER_STEP: &str = "seed_runs";

/// Runs seed plans against a database.
pub struct SeedOrchestrator<'a> {
    db: &'a DatabaseConnection,
    ctx: &'a SeedContext,
    present: BTreeSet<EntityKind>,
}

impl<'a> SeedOrchestrator<'a> {
    /// Creates an orchestrator.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection, ctx: &'a SeedContext) -> Self {
        Self {
            db,
            ctx,
            present: BTreeSet::new(),
        }
    }

    /// Declares kinds already seeded by an earlier run, for partial plans.
    #[must_use]
    pub fn assuming_present(mut self, kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        self.present.extend(kinds);
        self
    }

    /// Checks the plan against the dependency graph without touching the
    /// database.
    ///
    /// # Errors
    ///
    /// Returns the first ordering or truncation problem found.
    pub fn validate(&self, stages: &[Stage]) -> Result<(), SeedError> {
        let manifests: Vec<_> = stages.iter().map(Stage::manifest).collect();
        validate_plan_with(&manifests, &self.present)?;
        Ok(())
    }

    /// Validates and executes `stages` in order.
    ///
    /// Each stage commits in its own maintenance transaction together with
    /// its ledger row. A failing required stage stops the run; a failing
    /// optional stage is reported as a warning unless `fail_fast` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is invalid or the ledger cannot be read.
    /// Stage failures are reported in the [`RunReport`] instead.
    pub async fn run(&self, stages: &[Stage]) -> Result<RunReport, SeedError> {
        self.validate(stages)?;

        let last = ledger::last_batch(self.db)
            .await
            .map_err(|e| db_error(LEDGER_STEP, e))?;
        let batch = next_batch(last);
        let mut report = RunReport::new(batch);
        let fail_fast = self.ctx.config().fail_fast;

        info!(batch, stages = stages.len(), "Starting seed run");

        for stage in stages {
            let recorded = ledger::is_recorded(self.db, &stage.name)
                .await
                .map_err(|e| db_error(LEDGER_STEP, e))?;
            let policy = if fail_fast {
                StagePolicy::Required
            } else {
                stage.policy
            };

            if stage.run.decide(recorded) == StageDecision::SkipAlreadyApplied {
                info!(stage = %stage.name, "Stage already applied, skipping");
                report.stages.push(StageReport {
                    stage: stage.name.clone(),
                    policy,
                    outcome: StageOutcome::Skipped,
                });
                continue;
            }

            match self.run_stage(stage, batch).await {
                Ok(summary) => {
                    info!(stage = %stage.name, %summary, "Stage committed");
                    report.stages.push(StageReport {
                        stage: stage.name.clone(),
                        policy,
                        outcome: StageOutcome::Committed(summary),
                    });
                }
                Err(err) => {
                    let stop = policy == StagePolicy::Required;
                    if stop {
                        error!(stage = %stage.name, error = %err, code = err.error_code(), "Required stage failed");
                    } else {
                        warn!(stage = %stage.name, error = %err, code = err.error_code(), "Optional stage failed, continuing");
                    }
                    report.stages.push(StageReport {
                        stage: stage.name.clone(),
                        policy,
                        outcome: StageOutcome::Failed(err),
                    });
                    if stop {
                        break;
                    }
                }
            }
        }

        info!(batch, success = report.is_success(), "Seed run finished");
        Ok(report)
    }

    async fn run_stage(&self, stage: &Stage, batch: i32) -> Result<StepSummary, SeedError> {
        let maintenance = MaintenanceTransaction::begin(self.db)
            .await
            .map_err(|e| db_error(&stage.name, e))?;

        let result = match self.run_steps(maintenance.transaction(), stage, batch).await {
            Ok(summary) => Self::verify(&maintenance, &stage.name).await.map(|()| summary),
            Err(err) => Err(err),
        };

        match result {
            Ok(summary) => {
                maintenance
                    .commit()
                    .await
                    .map_err(|e| db_error(&stage.name, e))?;
                Ok(summary)
            }
            Err(err) => {
                if let Err(rollback) = maintenance.rollback().await {
                    warn!(stage = %stage.name, error = %rollback, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Fails the stage if deferred foreign keys dangle, while the
    /// transaction can still be rolled back.
    async fn verify(maintenance: &MaintenanceTransaction, stage: &str) -> Result<(), SeedError> {
        let violations = maintenance
            .deferred_violations()
            .await
            .map_err(|e| db_error(stage, e))?;
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SeedError::ForeignKeyViolation {
                step: stage.to_string(),
                reference: violations.join("; "),
            })
        }
    }

    async fn run_steps(
        &self,
        txn: &DatabaseTransaction,
        stage: &Stage,
        batch: i32,
    ) -> Result<StepSummary, SeedError> {
        let mut total = StepSummary::default();

        for step in &stage.steps {
            let manifest = step.manifest();
            if manifest.truncates.is_empty() {
                continue;
            }
            for kind in truncation_order(manifest.truncates) {
                let result = txn
                    .execute_unprepared(&format!("DELETE FROM {}", kind.table_name()))
                    .await
                    .map_err(|e| db_error(manifest.name, e))?;
                debug!(step = manifest.name, table = kind.table_name(), rows = result.rows_affected(), "Truncated");
                total.deleted += result.rows_affected();
            }
        }

        for step in &stage.steps {
            let name = step.manifest().name;
            debug!(stage = %stage.name, step = name, "Running step");
            let summary = step.run(txn, self.ctx).await?;
            info!(stage = %stage.name, step = name, %summary, "Step complete");
            total += summary;
        }

        ledger::record(txn, &stage.name, batch, self.ctx.started_at())
            .await
            .map_err(|e| db_error(LEDGER_STEP, e))?;

        Ok(total)
    }
}
