//! Seed plan and seed run errors.

use thiserror::Error;

use crate::identity::IdentityError;

use super::graph::EntityKind;

/// A seed plan that cannot run safely. Detected before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A step writes a kind whose parent is not written by an earlier stage.
    #[error("step '{step}' in stage '{stage}' writes {kind} before {requires} exists")]
    MissingDependency {
        /// Stage holding the step.
        stage: String,
        /// Offending step.
        step: String,
        /// Kind the step writes.
        kind: EntityKind,
        /// Dependency that is not yet seeded.
        requires: EntityKind,
    },

    /// A required stage relies on rows only an optional stage writes.
    #[error("required step '{step}' depends on {requires}, which only optional stage '{provider}' seeds")]
    RequiredDependsOnOptional {
        /// Offending step.
        step: String,
        /// Dependency kind.
        requires: EntityKind,
        /// Optional stage that writes it.
        provider: String,
    },

    /// A truncating step would leave a dependent table empty.
    #[error("step '{step}' truncates {truncated} but stage '{stage}' does not reseed dependent {dependent}")]
    UnseededDependent {
        /// Stage holding the step.
        stage: String,
        /// Offending step.
        step: String,
        /// Table the step truncates.
        truncated: EntityKind,
        /// Dependent table nobody in the stage writes.
        dependent: EntityKind,
    },

    /// Two stages share a name.
    #[error("duplicate stage name '{0}'")]
    DuplicateStage(String),

    /// Two steps share a name.
    #[error("duplicate step name '{0}'")]
    DuplicateStep(String),
}

impl PlanError {
    /// Name of the step the error is about, if any.
    #[must_use]
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::MissingDependency { step, .. }
            | Self::RequiredDependsOnOptional { step, .. }
            | Self::UnseededDependent { step, .. }
            | Self::DuplicateStep(step) => Some(step),
            Self::DuplicateStage(_) => None,
        }
    }
}

/// Failure of a single seed step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// The identity registry has no entry for a key the step needs.
    #[error("step '{step}': unknown registry key '{key}'")]
    UnknownKey {
        /// Failing step.
        step: String,
        /// Missing key.
        key: String,
    },

    /// A row referenced a parent that does not exist.
    #[error("step '{step}': foreign key violation: {reference}")]
    ForeignKeyViolation {
        /// Failing step.
        step: String,
        /// The offending reference.
        reference: String,
    },

    /// A plain insert collided with an existing row.
    #[error("step '{step}': row already exists: {key}")]
    AlreadyExists {
        /// Failing step.
        step: String,
        /// Natural key or database detail of the collision.
        key: String,
    },

    /// The plan is malformed in a way unrelated to ordering.
    #[error("invalid seed plan: {0}")]
    InvalidPlan(PlanError),

    /// Any other database failure.
    #[error("step '{step}': database error: {message}")]
    Database {
        /// Failing step.
        step: String,
        /// Driver message.
        message: String,
    },
}

impl SeedError {
    /// Wraps a registry lookup failure for `step`.
    #[must_use]
    pub fn identity(step: &str, err: &IdentityError) -> Self {
        Self::UnknownKey {
            step: step.to_string(),
            key: err.key().to_string(),
        }
    }

    /// Name of the failing step, if the error is tied to one.
    #[must_use]
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::UnknownKey { step, .. }
            | Self::ForeignKeyViolation { step, .. }
            | Self::AlreadyExists { step, .. }
            | Self::Database { step, .. } => Some(step),
            Self::InvalidPlan(err) => err.step(),
        }
    }

    /// Returns the process exit code the seeder CLI uses for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPlan(_) => 2,
            Self::UnknownKey { .. }
            | Self::ForeignKeyViolation { .. }
            | Self::AlreadyExists { .. }
            | Self::Database { .. } => 1,
        }
    }

    /// Returns the error code for logs and reports.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKey { .. } => "UNKNOWN_KEY",
            Self::ForeignKeyViolation { .. } => "FOREIGN_KEY_VIOLATION",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::InvalidPlan(_) => "INVALID_PLAN",
            Self::Database { .. } => "DATABASE_ERROR",
        }
    }
}

impl From<PlanError> for SeedError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::MissingDependency {
                step,
                kind,
                requires,
                ..
            } => Self::ForeignKeyViolation {
                step,
                reference: format!("{kind} requires {requires}"),
            },
            PlanError::RequiredDependsOnOptional { step, requires, .. } => {
                Self::ForeignKeyViolation {
                    step,
                    reference: format!("{requires} is only seeded by an optional stage"),
                }
            }
            other => Self::InvalidPlan(other),
        }
    }
}
