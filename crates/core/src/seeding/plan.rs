//! Seed plan description and validation.
//!
//! A plan is an ordered list of stages. Each stage is one level of the
//! dependency-ordered inserter and commits in its own transaction. Steps in a
//! stage declare which kinds they write and truncate so the whole plan can be
//! checked against the [`EntityKind`] graph before the first statement runs.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::PlanError;
use super::graph::{EntityKind, dependents_closure};

/// What a stage failure means for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePolicy {
    /// Failure aborts the run.
    Required,
    /// Failure is reported as a warning; the run goes on.
    Optional,
}

impl fmt::Display for StagePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Optional => write!(f, "optional"),
        }
    }
}

/// How often a stage may be applied to the same database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPolicy {
    /// Idempotent; runs on every seed invocation.
    Always,
    /// Append-only; skipped once the ledger records it.
    Once,
}

/// Whether a stage runs in this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageDecision {
    /// Execute the stage.
    Run,
    /// The ledger already records this run-once stage.
    SkipAlreadyApplied,
}

impl RunPolicy {
    /// Decides whether a stage runs given its ledger state.
    #[must_use]
    pub const fn decide(self, already_recorded: bool) -> StageDecision {
        match (self, already_recorded) {
            (Self::Once, true) => StageDecision::SkipAlreadyApplied,
            _ => StageDecision::Run,
        }
    }
}

/// Returns the batch number for a new run given the highest recorded one.
#[must_use]
pub fn next_batch(last: Option<i32>) -> i32 {
    last.map_or(1, |batch| batch.saturating_add(1))
}

/// Static description of one seed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepManifest {
    /// Unique step name, used in logs and errors.
    pub name: &'static str,
    /// Kinds the step inserts or updates.
    pub writes: &'static [EntityKind],
    /// Kinds the step empties before writing.
    pub truncates: &'static [EntityKind],
}

impl StepManifest {
    /// A step that only inserts or upserts.
    #[must_use]
    pub const fn new(name: &'static str, writes: &'static [EntityKind]) -> Self {
        Self {
            name,
            writes,
            truncates: &[],
        }
    }

    /// Marks the step as truncate-and-reinsert for `kinds`.
    #[must_use]
    pub const fn truncating(mut self, kinds: &'static [EntityKind]) -> Self {
        self.truncates = kinds;
        self
    }
}

/// Static description of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageManifest {
    /// Unique stage name, recorded in the ledger.
    pub name: String,
    /// Failure policy.
    pub policy: StagePolicy,
    /// Re-run policy.
    pub run: RunPolicy,
    /// Steps, in execution order.
    pub steps: Vec<StepManifest>,
}

impl StageManifest {
    /// Every kind written by any step of this stage.
    #[must_use]
    pub fn writes(&self) -> BTreeSet<EntityKind> {
        self.steps
            .iter()
            .flat_map(|step| step.writes.iter().copied())
            .collect()
    }
}

/// Validates a plan that starts from an empty schema.
///
/// # Errors
///
/// See [`validate_plan_with`].
pub fn validate_plan(stages: &[StageManifest]) -> Result<(), PlanError> {
    validate_plan_with(stages, &BTreeSet::new())
}

/// Validates a plan, treating `present` as already seeded.
///
/// Checks, in stage order:
/// - stage and step names are unique;
/// - every dependency of a written kind is written by an earlier stage, by
///   the same step, or is in `present` (steps of one stage never satisfy
///   each other);
/// - a required stage never depends on a kind only optional stages write;
/// - every truncated table has its full dependents closure rewritten by the
///   same stage.
///
/// # Errors
///
/// Returns the first [`PlanError`] found.
pub fn validate_plan_with(
    stages: &[StageManifest],
    present: &BTreeSet<EntityKind>,
) -> Result<(), PlanError> {
    let mut guaranteed = present.clone();
    let mut optional_providers: BTreeMap<EntityKind, &str> = BTreeMap::new();
    let mut stage_names = HashSet::new();
    let mut step_names = HashSet::new();

    for stage in stages {
        if !stage_names.insert(stage.name.as_str()) {
            return Err(PlanError::DuplicateStage(stage.name.clone()));
        }

        let stage_writes = stage.writes();

        for step in &stage.steps {
            if !step_names.insert(step.name) {
                return Err(PlanError::DuplicateStep(step.name.to_string()));
            }

            for kind in step.writes {
                for requires in kind.dependencies() {
                    if step.writes.contains(requires) || guaranteed.contains(requires) {
                        continue;
                    }
                    match (optional_providers.get(requires), stage.policy) {
                        (Some(_), StagePolicy::Optional) => {}
                        (Some(provider), StagePolicy::Required) => {
                            return Err(PlanError::RequiredDependsOnOptional {
                                step: step.name.to_string(),
                                requires: *requires,
                                provider: (*provider).to_string(),
                            });
                        }
                        (None, _) => {
                            return Err(PlanError::MissingDependency {
                                stage: stage.name.clone(),
                                step: step.name.to_string(),
                                kind: *kind,
                                requires: *requires,
                            });
                        }
                    }
                }
            }

            for truncated in step.truncates {
                if let Some(dependent) = dependents_closure(&[*truncated])
                    .into_iter()
                    .find(|kind| !stage_writes.contains(kind))
                {
                    return Err(PlanError::UnseededDependent {
                        stage: stage.name.clone(),
                        step: step.name.to_string(),
                        truncated: *truncated,
                        dependent,
                    });
                }
            }
        }

        for kind in stage_writes {
            match stage.policy {
                StagePolicy::Required => {
                    guaranteed.insert(kind);
                    optional_providers.remove(&kind);
                }
                StagePolicy::Optional if !guaranteed.contains(&kind) => {
                    optional_providers.entry(kind).or_insert(stage.name.as_str());
                }
                StagePolicy::Optional => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use EntityKind::{Channel, ChannelFormat, Market, Membership, Organization, Role, User};

    fn stage(name: &str, policy: StagePolicy, steps: Vec<StepManifest>) -> StageManifest {
        StageManifest {
            name: name.to_string(),
            policy,
            run: RunPolicy::Always,
            steps,
        }
    }

    #[test]
    fn test_parents_before_children_is_valid() {
        let plan = vec![
            stage(
                "reference",
                StagePolicy::Required,
                vec![
                    StepManifest::new("channels", &[Channel, ChannelFormat])
                        .truncating(&[Channel]),
                ],
            ),
            stage(
                "identity",
                StagePolicy::Required,
                vec![
                    StepManifest::new("organizations", &[Organization]),
                    StepManifest::new("users", &[User]),
                    StepManifest::new("roles", &[Role]),
                ],
            ),
            stage(
                "memberships",
                StagePolicy::Required,
                vec![StepManifest::new("memberships", &[Membership])],
            ),
        ];
        assert_eq!(validate_plan(&plan), Ok(()));
    }

    #[test]
    fn test_steps_in_one_stage_cannot_satisfy_each_other() {
        let plan = vec![stage(
            "identity",
            StagePolicy::Required,
            vec![
                StepManifest::new("users", &[User]),
                StepManifest::new("memberships", &[Membership]),
            ],
        )];
        assert_eq!(
            validate_plan(&plan),
            Err(PlanError::MissingDependency {
                stage: "identity".into(),
                step: "memberships".into(),
                kind: Membership,
                requires: User,
            })
        );
    }

    #[test]
    fn test_present_kinds_satisfy_dependencies() {
        let plan = vec![stage(
            "late",
            StagePolicy::Required,
            vec![StepManifest::new("memberships", &[Membership])],
        )];
        let present = BTreeSet::from([User, Organization, Role]);
        assert_eq!(validate_plan_with(&plan, &present), Ok(()));
    }

    #[test]
    fn test_required_stage_cannot_lean_on_optional_stage() {
        let plan = vec![
            stage(
                "demo-orgs",
                StagePolicy::Optional,
                vec![StepManifest::new("organizations", &[Organization])],
            ),
            stage(
                "identity",
                StagePolicy::Required,
                vec![StepManifest::new("users", &[User, Role, Membership])],
            ),
        ];
        assert_eq!(
            validate_plan(&plan),
            Err(PlanError::RequiredDependsOnOptional {
                step: "users".into(),
                requires: Organization,
                provider: "demo-orgs".into(),
            })
        );
    }

    #[test]
    fn test_truncation_must_reseed_dependents() {
        let plan = vec![
            stage(
                "reference",
                StagePolicy::Required,
                vec![StepManifest::new("channels", &[Channel]).truncating(&[Channel])],
            ),
            stage(
                "formats",
                StagePolicy::Required,
                vec![StepManifest::new("formats", &[ChannelFormat])],
            ),
        ];
        assert_eq!(
            validate_plan(&plan),
            Err(PlanError::UnseededDependent {
                stage: "reference".into(),
                step: "channels".into(),
                truncated: Channel,
                dependent: ChannelFormat,
            })
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let plan = vec![
            stage("a", StagePolicy::Required, vec![StepManifest::new("markets", &[Market])]),
            stage("a", StagePolicy::Required, vec![]),
        ];
        assert_eq!(
            validate_plan(&plan),
            Err(PlanError::DuplicateStage("a".into()))
        );

        let plan = vec![
            stage("a", StagePolicy::Required, vec![StepManifest::new("markets", &[Market])]),
            stage("b", StagePolicy::Required, vec![StepManifest::new("markets", &[Market])]),
        ];
        assert_eq!(
            validate_plan(&plan),
            Err(PlanError::DuplicateStep("markets".into()))
        );
    }

    #[test]
    fn test_run_policy_decision() {
        assert_eq!(RunPolicy::Always.decide(true), StageDecision::Run);
        assert_eq!(RunPolicy::Once.decide(false), StageDecision::Run);
        assert_eq!(
            RunPolicy::Once.decide(true),
            StageDecision::SkipAlreadyApplied
        );
    }

    #[test]
    fn test_next_batch_increases() {
        assert_eq!(next_batch(None), 1);
        assert_eq!(next_batch(Some(1)), 2);
        assert_eq!(next_batch(Some(41)), 42);
    }
}
