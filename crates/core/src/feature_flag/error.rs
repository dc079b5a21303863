//! Feature flag error types.

use thiserror::Error;

use super::rules::Precedence;

/// Errors raised by feature flag reads and toggles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureFlagError {
    /// Enabling was refused because prerequisite flags are disabled.
    #[error("cannot enable '{flag}': enable {} first", .missing.join(", "))]
    DependencyNotMet {
        /// Flag being enabled.
        flag: String,
        /// Disabled prerequisites, in declaration order.
        missing: Vec<String>,
    },

    /// No flag with this key exists.
    #[error("feature flag '{0}' not found")]
    NotFound(String),

    /// A higher-precedence value decides the flag, so writing the
    /// organization row would not change it.
    #[error("cannot set '{flag}' to {requested}: the {by} decides its value")]
    Overridden {
        /// Flag being written.
        flag: String,
        /// Requested organization value.
        requested: bool,
        /// Value that outranks the organization row.
        by: Precedence,
    },

    /// The flag changed between read and write.
    #[error("feature flag '{0}' was modified concurrently")]
    Conflict(String),

    /// Unrecognised scope type string.
    #[error("invalid scope type '{0}'")]
    InvalidScope(String),

    /// Unrecognised status filter.
    #[error("invalid status filter '{0}'")]
    InvalidFilter(String),

    /// Database failure.
    #[error("database error: {0}")]
    Database(String),
}

impl FeatureFlagError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidScope(_) | Self::InvalidFilter(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) | Self::Overridden { .. } => 409,
            Self::DependencyNotMet { .. } => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DependencyNotMet { .. } => "dependency_not_met",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Overridden { .. } => "overridden",
            Self::InvalidScope(_) => "invalid_scope",
            Self::InvalidFilter(_) => "invalid_filter",
            Self::Database(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_not_met_message_lists_missing() {
        let err = FeatureFlagError::DependencyNotMet {
            flag: "paid_campaigns.google.enabled".into(),
            missing: vec!["paid_campaigns.meta.enabled".into()],
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "dependency_not_met");
        assert_eq!(
            err.to_string(),
            "cannot enable 'paid_campaigns.google.enabled': enable paid_campaigns.meta.enabled first"
        );
    }

    #[test]
    fn test_overridden_names_the_deciding_value() {
        let err = FeatureFlagError::Overridden {
            flag: "scheduling.meta.enabled".into(),
            requested: false,
            by: Precedence::OrganizationOverride,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "overridden");
        assert_eq!(
            err.to_string(),
            "cannot set 'scheduling.meta.enabled' to false: the organization override decides its value"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(FeatureFlagError::NotFound("x".into()).status_code(), 404);
        assert_eq!(FeatureFlagError::Conflict("x".into()).status_code(), 409);
        assert_eq!(FeatureFlagError::InvalidFilter("x".into()).status_code(), 400);
        assert_eq!(FeatureFlagError::Database("x".into()).status_code(), 500);
    }
}
