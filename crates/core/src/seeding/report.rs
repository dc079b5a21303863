//! Per-step and per-run seed results.

use std::fmt;
use std::ops::AddAssign;

use super::error::SeedError;
use super::plan::StagePolicy;

/// Row counts produced by one step or stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
    /// Rows inserted.
    pub inserted: u64,
    /// Existing rows updated in place.
    pub updated: u64,
    /// Rows removed by truncation.
    pub deleted: u64,
}

impl StepSummary {
    /// Summary of `n` inserted rows.
    #[must_use]
    pub const fn inserted(n: u64) -> Self {
        Self {
            inserted: n,
            updated: 0,
            deleted: 0,
        }
    }

    /// Rows written (inserted or updated).
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.inserted + self.updated
    }
}

impl AddAssign for StepSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.inserted += rhs.inserted;
        self.updated += rhs.updated;
        self.deleted += rhs.deleted;
    }
}

impl fmt::Display for StepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} deleted",
            self.inserted, self.updated, self.deleted
        )
    }
}

/// What happened to a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage transaction committed.
    Committed(StepSummary),
    /// Run-once stage already recorded in the ledger.
    Skipped,
    /// The stage was rolled back.
    Failed(SeedError),
}

/// Result of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// Stage name.
    pub stage: String,
    /// Failure policy the stage ran under.
    pub policy: StagePolicy,
    /// Outcome.
    pub outcome: StageOutcome,
}

/// Result of a whole seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Ledger batch number of this run.
    pub batch: i32,
    /// Stages that were reached, in order.
    pub stages: Vec<StageReport>,
}

impl RunReport {
    /// Creates an empty report for `batch`.
    #[must_use]
    pub const fn new(batch: i32) -> Self {
        Self {
            batch,
            stages: Vec::new(),
        }
    }

    /// Returns true if no required stage failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.required_failure().is_none()
    }

    /// The required stage that stopped the run, if any.
    #[must_use]
    pub fn required_failure(&self) -> Option<(&str, &SeedError)> {
        self.stages.iter().find_map(|report| match &report.outcome {
            StageOutcome::Failed(err) if report.policy == StagePolicy::Required => {
                Some((report.stage.as_str(), err))
            }
            _ => None,
        })
    }

    /// Optional stages that failed.
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &SeedError)> {
        self.stages.iter().filter_map(|report| match &report.outcome {
            StageOutcome::Failed(err) if report.policy == StagePolicy::Optional => {
                Some((report.stage.as_str(), err))
            }
            _ => None,
        })
    }

    /// Names of committed stages.
    pub fn committed(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().filter_map(|report| match report.outcome {
            StageOutcome::Committed(_) => Some(report.stage.as_str()),
            _ => None,
        })
    }

    /// Totals across committed stages.
    #[must_use]
    pub fn totals(&self) -> StepSummary {
        let mut total = StepSummary::default();
        for report in &self.stages {
            if let StageOutcome::Committed(summary) = report.outcome {
                total += summary;
            }
        }
        total
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed batch {}", self.batch)?;
        for report in &self.stages {
            match &report.outcome {
                StageOutcome::Committed(summary) => {
                    writeln!(f, "  [ok]   {}: {summary}", report.stage)?;
                }
                StageOutcome::Skipped => {
                    writeln!(f, "  [skip] {}: already applied", report.stage)?;
                }
                StageOutcome::Failed(err) => {
                    let tag = match report.policy {
                        StagePolicy::Required => "fail",
                        StagePolicy::Optional => "warn",
                    };
                    writeln!(f, "  [{tag}] {}: {err}", report.stage)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(stage: &str, policy: StagePolicy) -> StageReport {
        StageReport {
            stage: stage.to_string(),
            policy,
            outcome: StageOutcome::Failed(SeedError::Database {
                step: "step".into(),
                message: "boom".into(),
            }),
        }
    }

    #[test]
    fn test_optional_failure_is_a_warning() {
        let mut report = RunReport::new(3);
        report.stages.push(StageReport {
            stage: "identity".into(),
            policy: StagePolicy::Required,
            outcome: StageOutcome::Committed(StepSummary::inserted(7)),
        });
        report.stages.push(failed("demo", StagePolicy::Optional));

        assert!(report.is_success());
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.committed().collect::<Vec<_>>(), vec!["identity"]);
        assert_eq!(report.totals().inserted, 7);
    }

    #[test]
    fn test_required_failure_fails_run() {
        let mut report = RunReport::new(1);
        report.stages.push(failed("identity", StagePolicy::Required));

        assert!(!report.is_success());
        let (stage, err) = report.required_failure().unwrap();
        assert_eq!(stage, "identity");
        assert_eq!(err.step(), Some("step"));
        assert!(report.to_string().contains("[fail] identity"));
    }

    #[test]
    fn test_summary_accumulates() {
        let mut total = StepSummary::inserted(2);
        total += StepSummary {
            inserted: 1,
            updated: 4,
            deleted: 3,
        };
        assert_eq!(total.written(), 7);
        assert_eq!(total.to_string(), "3 inserted, 4 updated, 3 deleted");
    }
}
