//! Stateless feature flag rules: value resolution, dependency gating and
//! bulk-enable ordering.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::FeatureFlagError;
use super::types::{FlagView, PLATFORMS, SkippedFlag, platform_flag_key};

/// A per-user or per-organization override row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideValue {
    /// Forced value.
    pub value: bool,
    /// Expiry; `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl OverrideValue {
    /// Returns true if the override still applies at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Every stored value that can decide a flag for one caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Override for the calling user.
    pub user_override: Option<OverrideValue>,
    /// Platform-scoped row for the platform named in the key.
    pub platform: Option<bool>,
    /// Override for the whole organization.
    pub org_override: Option<OverrideValue>,
    /// Organization-scoped row.
    pub organization: Option<bool>,
    /// System-scoped row.
    pub system: Option<bool>,
}

impl Resolution {
    /// Effective value: active user override, then the platform row, an
    /// active organization override, the organization and system rows;
    /// disabled when nothing is stored.
    #[must_use]
    pub fn resolve(&self, now: DateTime<Utc>) -> bool {
        self.user_override
            .filter(|o| o.is_active(now))
            .map(|o| o.value)
            .or(self.platform)
            .or(self.org_override.filter(|o| o.is_active(now)).map(|o| o.value))
            .or(self.organization)
            .or(self.system)
            .unwrap_or(false)
    }

    /// Stored value that outranks the organization row, if any.
    ///
    /// While one exists, writing the organization row cannot change the
    /// organization-wide effective value.
    #[must_use]
    pub fn outranking_org_row(&self, now: DateTime<Utc>) -> Option<Precedence> {
        if self.platform.is_some() {
            Some(Precedence::PlatformRow)
        } else if self.org_override.is_some_and(|o| o.is_active(now)) {
            Some(Precedence::OrganizationOverride)
        } else {
            None
        }
    }
}

/// Stored values ranked above the organization row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// Platform-scoped row.
    PlatformRow,
    /// Active organization override.
    OrganizationOverride,
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PlatformRow => "platform row",
            Self::OrganizationOverride => "organization override",
        })
    }
}

/// Feature flag business rules.
pub struct FeatureFlagRules;

impl FeatureFlagRules {
    /// Checks that every prerequisite of `flag_key` is enabled.
    ///
    /// # Errors
    ///
    /// Returns `DependencyNotMet` listing the disabled prerequisites in
    /// declaration order.
    pub fn check_dependencies<F>(
        flag_key: &str,
        dependencies: &[String],
        is_enabled: F,
    ) -> Result<(), FeatureFlagError>
    where
        F: Fn(&str) -> bool,
    {
        let missing = Self::missing_dependencies(dependencies, is_enabled);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FeatureFlagError::DependencyNotMet {
                flag: flag_key.to_string(),
                missing,
            })
        }
    }

    fn missing_dependencies<F>(dependencies: &[String], is_enabled: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        dependencies
            .iter()
            .filter(|dep| !is_enabled(dep))
            .cloned()
            .collect()
    }

    /// Orders flags so that every flag comes after the prerequisites that are
    /// part of the same batch. Ties break alphabetically. Flags caught in a
    /// dependency cycle are appended at the end in key order.
    #[must_use]
    pub fn enable_order(flags: &[FlagView]) -> Vec<String> {
        let keys: BTreeSet<&str> = flags.iter().map(|f| f.flag_key.as_str()).collect();
        let mut pending: BTreeMap<&str, usize> = BTreeMap::new();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

        for flag in flags {
            let in_batch: BTreeSet<&str> = flag
                .dependencies
                .iter()
                .map(String::as_str)
                .filter(|dep| keys.contains(dep) && *dep != flag.flag_key)
                .collect();
            for dep in &in_batch {
                dependents.entry(*dep).or_default().push(&flag.flag_key);
            }
            pending.insert(&flag.flag_key, in_batch.len());
        }

        let mut ready: BTreeSet<&str> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(key, _)| *key)
            .collect();
        let mut order = Vec::with_capacity(flags.len());

        while let Some(key) = ready.pop_first() {
            pending.remove(key);
            order.push(key.to_string());
            for dependent in dependents.get(key).into_iter().flatten() {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(*dependent);
                    }
                }
            }
        }

        order.extend(pending.into_keys().map(str::to_string));
        order
    }

    /// Decides which of `flags` a bulk enable turns on.
    ///
    /// `effective` holds the current effective value of every flag of the
    /// organization, including flags outside the batch. `outranked` reports
    /// flags whose organization row is shadowed by a higher-precedence value;
    /// those are never written and never satisfy a dependent. Flags are
    /// visited in [`FeatureFlagRules::enable_order`]; a flag enabled earlier
    /// in the batch satisfies later dependents.
    #[must_use]
    pub fn plan_enable_all<F>(
        flags: &[FlagView],
        effective: &HashMap<String, bool>,
        outranked: F,
    ) -> BulkPlan
    where
        F: Fn(&str) -> bool,
    {
        let by_key: HashMap<&str, &FlagView> =
            flags.iter().map(|f| (f.flag_key.as_str(), f)).collect();
        let mut state = effective.clone();
        let mut plan = BulkPlan::default();

        for key in Self::enable_order(flags) {
            let Some(flag) = by_key.get(key.as_str()) else {
                continue;
            };
            if state.get(&key).copied().unwrap_or(false) {
                plan.unchanged.push(key);
                continue;
            }
            if outranked(&key) {
                plan.overridden.push(key);
                continue;
            }
            let missing = Self::missing_dependencies(&flag.dependencies, |dep| {
                state.get(dep).copied().unwrap_or(false)
            });
            if missing.is_empty() {
                state.insert(key.clone(), true);
                plan.apply.push(key);
            } else {
                plan.skipped.push(SkippedFlag {
                    flag_key: key,
                    missing,
                });
            }
        }

        plan
    }

    /// Decides which of `flags` a bulk disable turns off.
    ///
    /// Enabled flags that are `outranked` stay enabled and are reported as
    /// overridden.
    #[must_use]
    pub fn plan_disable_all<F>(flags: &[FlagView], outranked: F) -> BulkPlan
    where
        F: Fn(&str) -> bool,
    {
        let mut plan = BulkPlan::default();
        for flag in flags {
            if !flag.is_enabled {
                plan.unchanged.push(flag.flag_key.clone());
            } else if outranked(&flag.flag_key) {
                plan.overridden.push(flag.flag_key.clone());
            } else {
                plan.apply.push(flag.flag_key.clone());
            }
        }
        plan
    }

    /// Builds the `feature -> platform -> enabled` matrix.
    pub fn feature_matrix<F>(features: &[&str], is_enabled: F) -> FeatureMatrix
    where
        F: Fn(&str) -> bool,
    {
        features
            .iter()
            .map(|feature| {
                let row = PLATFORMS
                    .iter()
                    .map(|platform| {
                        let enabled = is_enabled(&platform_flag_key(feature, platform));
                        ((*platform).to_string(), enabled)
                    })
                    .collect();
                ((*feature).to_string(), row)
            })
            .collect()
    }

    /// Platforms with `feature` enabled.
    pub fn enabled_platforms<F>(feature: &str, is_enabled: F) -> Vec<&'static str>
    where
        F: Fn(&str) -> bool,
    {
        PLATFORMS
            .iter()
            .copied()
            .filter(|platform| is_enabled(&platform_flag_key(feature, platform)))
            .collect()
    }
}

/// `feature -> platform -> enabled`.
pub type FeatureMatrix = BTreeMap<String, BTreeMap<String, bool>>;

/// Pure outcome of planning a bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkPlan {
    /// Flags to write, in write order.
    pub apply: Vec<String>,
    /// Flags already in the requested state.
    pub unchanged: Vec<String>,
    /// Flags whose prerequisites stay disabled.
    pub skipped: Vec<SkippedFlag>,
    /// Flags a higher-precedence value keeps in the other state.
    pub overridden: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_flag::types::FlagMetadata;
    use chrono::Duration;

    fn flag(key: &str, deps: &[&str], enabled: bool) -> FlagView {
        let metadata = FlagMetadata {
            dependencies: deps.iter().map(|d| (*d).to_string()).collect(),
            ..FlagMetadata::default()
        };
        FlagView::new(key, &metadata, enabled)
    }

    fn effective(flags: &[FlagView]) -> HashMap<String, bool> {
        flags
            .iter()
            .map(|f| (f.flag_key.clone(), f.is_enabled))
            .collect()
    }

    #[test]
    fn test_resolution_hierarchy() {
        let now = Utc::now();
        let mut input = Resolution {
            system: Some(false),
            ..Resolution::default()
        };
        assert!(!input.resolve(now));

        input.organization = Some(true);
        assert!(input.resolve(now));

        input.org_override = Some(OverrideValue {
            value: false,
            expires_at: None,
        });
        assert!(!input.resolve(now));

        input.org_override = Some(OverrideValue {
            value: true,
            expires_at: None,
        });
        input.platform = Some(false);
        assert!(!input.resolve(now));

        input.user_override = Some(OverrideValue {
            value: true,
            expires_at: None,
        });
        assert!(input.resolve(now));
    }

    #[test]
    fn test_expired_override_is_ignored() {
        let now = Utc::now();
        let input = Resolution {
            user_override: Some(OverrideValue {
                value: true,
                expires_at: Some(now - Duration::minutes(1)),
            }),
            organization: Some(false),
            ..Resolution::default()
        };
        assert!(!input.resolve(now));
        assert!(!Resolution::default().resolve(now));
    }

    #[test]
    fn test_check_dependencies() {
        let deps = vec!["paid_campaigns.meta.enabled".to_string()];
        let err = FeatureFlagRules::check_dependencies(
            "paid_campaigns.google.enabled",
            &deps,
            |_| false,
        )
        .unwrap_err();
        assert_eq!(
            err,
            FeatureFlagError::DependencyNotMet {
                flag: "paid_campaigns.google.enabled".into(),
                missing: deps.clone(),
            }
        );

        assert!(
            FeatureFlagRules::check_dependencies("paid_campaigns.google.enabled", &deps, |_| true)
                .is_ok()
        );
    }

    #[test]
    fn test_enable_order_puts_dependencies_first() {
        // "a.dependent" sorts before "z.base" but depends on it.
        let flags = vec![
            flag("a.dependent", &["z.base"], false),
            flag("m.other", &[], false),
            flag("z.base", &[], false),
        ];
        assert_eq!(
            FeatureFlagRules::enable_order(&flags),
            vec!["m.other", "z.base", "a.dependent"]
        );
    }

    #[test]
    fn test_enable_order_keeps_cycles() {
        let flags = vec![flag("a", &["b"], false), flag("b", &["a"], false)];
        assert_eq!(FeatureFlagRules::enable_order(&flags), vec!["a", "b"]);
    }

    #[test]
    fn test_plan_enable_all_resolves_in_batch_dependencies() {
        let flags = vec![
            flag("paid_campaigns.google.enabled", &["paid_campaigns.meta.enabled"], false),
            flag("paid_campaigns.meta.enabled", &[], false),
            flag("scheduling.meta.enabled", &[], true),
        ];
        let plan = FeatureFlagRules::plan_enable_all(&flags, &effective(&flags), |_| false);
        assert_eq!(
            plan.apply,
            vec!["paid_campaigns.meta.enabled", "paid_campaigns.google.enabled"]
        );
        assert_eq!(plan.unchanged, vec!["scheduling.meta.enabled"]);
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_plan_enable_all_skips_outside_dependencies() {
        let all = vec![
            flag("ai.campaign_generation", &["ai.content_generation"], false),
            flag("ai.content_generation", &[], false),
        ];
        let visible = vec![all[0].clone()];
        let plan = FeatureFlagRules::plan_enable_all(&visible, &effective(&all), |_| false);
        assert!(plan.apply.is_empty());
        assert_eq!(
            plan.skipped,
            vec![SkippedFlag {
                flag_key: "ai.campaign_generation".into(),
                missing: vec!["ai.content_generation".into()],
            }]
        );
    }

    #[test]
    fn test_plan_disable_all() {
        let flags = vec![flag("a", &[], true), flag("b", &[], false)];
        let plan = FeatureFlagRules::plan_disable_all(&flags, |_| false);
        assert_eq!(plan.apply, vec!["a"]);
        assert_eq!(plan.unchanged, vec!["b"]);
    }

    #[test]
    fn test_plan_disable_all_leaves_outranked_flags() {
        let flags = vec![flag("a", &[], true), flag("b", &[], true)];
        let plan = FeatureFlagRules::plan_disable_all(&flags, |key| key == "b");
        assert_eq!(plan.apply, vec!["a"]);
        assert_eq!(plan.overridden, vec!["b"]);
    }

    #[test]
    fn test_outranked_dependency_does_not_satisfy_dependents() {
        let flags = vec![
            flag("paid_campaigns.google.enabled", &["paid_campaigns.meta.enabled"], false),
            flag("paid_campaigns.meta.enabled", &[], false),
        ];
        let plan = FeatureFlagRules::plan_enable_all(&flags, &effective(&flags), |key| {
            key == "paid_campaigns.meta.enabled"
        });
        assert!(plan.apply.is_empty());
        assert_eq!(plan.overridden, vec!["paid_campaigns.meta.enabled"]);
        assert_eq!(
            plan.skipped,
            vec![SkippedFlag {
                flag_key: "paid_campaigns.google.enabled".into(),
                missing: vec!["paid_campaigns.meta.enabled".into()],
            }]
        );
    }

    #[test]
    fn test_outranking_org_row() {
        let now = Utc::now();
        let mut input = Resolution {
            organization: Some(true),
            ..Resolution::default()
        };
        assert_eq!(input.outranking_org_row(now), None);

        input.org_override = Some(OverrideValue {
            value: false,
            expires_at: Some(now - Duration::minutes(1)),
        });
        assert_eq!(input.outranking_org_row(now), None);

        input.org_override = Some(OverrideValue {
            value: false,
            expires_at: None,
        });
        assert_eq!(
            input.outranking_org_row(now),
            Some(Precedence::OrganizationOverride)
        );

        input.platform = Some(true);
        assert_eq!(input.outranking_org_row(now), Some(Precedence::PlatformRow));
        assert_eq!(Precedence::PlatformRow.to_string(), "platform row");
    }

    #[test]
    fn test_feature_matrix_and_enabled_platforms() {
        let enabled = |key: &str| key == "scheduling.meta.enabled";
        let matrix = FeatureFlagRules::feature_matrix(&["scheduling", "analytics"], enabled);
        assert!(matrix["scheduling"]["meta"]);
        assert!(!matrix["scheduling"]["google"]);
        assert_eq!(matrix["analytics"].len(), PLATFORMS.len());
        assert_eq!(
            FeatureFlagRules::enabled_platforms("scheduling", enabled),
            vec!["meta"]
        );
    }
}
