//! Seed steps and stages.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, SqlErr};

use cmis_core::seeding::{
    RunPolicy, SeedError, StageManifest, StagePolicy, StepManifest, StepSummary,
};

use super::context::SeedContext;
use crate::upsert::UpsertOutcome;

/// One unit of seeding work inside a stage transaction.
#[async_trait]
pub trait SeedStep: Send + Sync {
    /// Static description used for plan validation.
    fn manifest(&self) -> StepManifest;

    /// Writes the step's rows.
    ///
    /// Steps run on the stage's maintenance transaction and must not touch
    /// any other connection.
    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError>;
}

/// A named group of steps committed atomically.
pub struct Stage {
    /// Unique name, recorded in the ledger.
    pub name: String,
    /// What a failure means for the run.
    pub policy: StagePolicy,
    /// Whether the stage re-runs.
    pub run: RunPolicy,
    /// Steps, in execution order.
    pub steps: Vec<Box<dyn SeedStep>>,
}

impl Stage {
    /// A required stage that runs on every invocation.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policy: StagePolicy::Required,
            run: RunPolicy::Always,
            steps: Vec::new(),
        }
    }

    /// An optional stage that runs on every invocation.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            policy: StagePolicy::Optional,
            ..Self::required(name)
        }
    }

    /// Makes the stage run-once.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.run = RunPolicy::Once;
        self
    }

    /// Appends a step.
    #[must_use]
    pub fn step(mut self, step: impl SeedStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Static description of the stage.
    #[must_use]
    pub fn manifest(&self) -> StageManifest {
        StageManifest {
            name: self.name.clone(),
            policy: self.policy,
            run: self.run,
            steps: self.steps.iter().map(|step| step.manifest()).collect(),
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("run", &self.run)
            .field("steps", &self.steps.len())
            .finish()
    }
}

/// Classifies a database error raised while running `step`.
#[must_use]
pub fn db_error(step: &str, err: DbErr) -> SeedError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(reference)) => SeedError::ForeignKeyViolation {
            step: step.to_string(),
            reference,
        },
        Some(SqlErr::UniqueConstraintViolation(key)) => SeedError::AlreadyExists {
            step: step.to_string(),
            key,
        },
        _ => SeedError::Database {
            step: step.to_string(),
            message: err.to_string(),
        },
    }
}

impl From<UpsertOutcome> for StepSummary {
    fn from(outcome: UpsertOutcome) -> Self {
        match outcome {
            UpsertOutcome::Inserted => Self::inserted(1),
            UpsertOutcome::Updated => Self {
                updated: 1,
                ..Self::default()
            },
        }
    }
}

/// Plain multi-row insert for truncate-and-reinsert and run-once steps.
///
/// # Errors
///
/// Returns the classified database error, naming `step`.
pub async fn insert_all<A>(
    txn: &DatabaseTransaction,
    step: &str,
    rows: Vec<A>,
) -> Result<StepSummary, SeedError>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    if rows.is_empty() {
        return Ok(StepSummary::default());
    }
    let inserted = A::Entity::insert_many(rows)
        .exec_without_returning(txn)
        .await
        .map_err(|e| db_error(step, e))?;
    Ok(StepSummary::inserted(inserted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclassified_errors_keep_driver_message() {
        let err = db_error("users", DbErr::Custom("boom".into()));
        assert_eq!(
            err,
            SeedError::Database {
                step: "users".into(),
                message: "Custom Error: boom".into(),
            }
        );
    }

    #[test]
    fn test_upsert_outcomes_count_separately() {
        let mut summary = StepSummary::from(UpsertOutcome::Inserted);
        summary += UpsertOutcome::Updated.into();
        summary += UpsertOutcome::Updated.into();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.updated, 2);
    }

    #[test]
    fn test_stage_builders() {
        let stage = Stage::optional("demo").once();
        assert_eq!(stage.policy, StagePolicy::Optional);
        assert_eq!(stage.run, RunPolicy::Once);
        assert!(stage.manifest().steps.is_empty());
    }
}
