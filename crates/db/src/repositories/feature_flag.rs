//! Feature flag repository for the admin API.
//!
//! Flags are stored per scope. An organization sees the system row of every
//! flag, its own organization rows, and platform rows for the platform named
//! in the key. Writes from the admin API always land on the organization row
//! and compare-and-swap on `version`. A write is refused when a platform row
//! or an active organization override outranks that row.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use cmis_core::feature_flag::{
    BulkOutcome, FeatureFlagError, FeatureFlagRules, FeatureMatrix, FlagCache, FlagFilter,
    FlagMetadata, FlagStats, FlagView, OverrideValue, PLATFORM_FEATURES, Resolution, ScopeType,
    ToggleOutcome, extract_platform,
};

use crate::entities::{feature_flag_overrides, feature_flags};

/// Override target kinds stored in `feature_flag_overrides.target_type`.
pub const USER_TARGET: &str = "user";
/// Organization-wide override target.
pub const ORGANIZATION_TARGET: &str = "organization";

/// Flags visible to an organization, ready for the admin list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FlagList {
    /// Flags matching the filter, ordered by key.
    pub flags: Vec<FlagView>,
    /// Counters over every flag, regardless of the filter.
    pub stats: FlagStats,
    /// Every category, sorted.
    pub categories: Vec<String>,
}

/// Input for a targeted override.
#[derive(Debug, Clone)]
pub struct OverrideInput {
    /// `user` or `organization`.
    pub target_type: String,
    /// User or organization id.
    pub target_id: Uuid,
    /// Forced value.
    pub value: bool,
    /// Why the override exists.
    pub reason: Option<String>,
    /// When the override stops applying.
    pub expires_at: Option<DateTime<Utc>>,
}

fn db_err(err: DbErr) -> FeatureFlagError {
    FeatureFlagError::Database(err.to_string())
}

/// Stored rows of one flag as seen by one organization.
#[derive(Debug, Default)]
struct ScopedRows {
    system: Option<feature_flags::Model>,
    organization: Option<feature_flags::Model>,
    platform: Option<bool>,
    user_override: Option<OverrideValue>,
    org_override: Option<OverrideValue>,
}

impl ScopedRows {
    fn metadata(&self) -> FlagMetadata {
        self.system
            .as_ref()
            .or(self.organization.as_ref())
            .and_then(|row| serde_json::from_value(row.metadata.clone()).ok())
            .unwrap_or_default()
    }

    fn resolution(&self) -> Resolution {
        Resolution {
            user_override: self.user_override,
            platform: self.platform,
            org_override: self.org_override,
            organization: self.organization.as_ref().map(|row| row.value),
            system: self.system.as_ref().map(|row| row.value),
        }
    }

    /// Row that carries version and write time for the view.
    fn deciding_row(&self) -> Option<&feature_flags::Model> {
        self.organization.as_ref().or(self.system.as_ref())
    }
}

/// Every flag of one organization, keyed by flag key.
#[derive(Debug, Default)]
struct OrgFlags {
    rows: BTreeMap<String, ScopedRows>,
}

impl OrgFlags {
    fn from_rows(rows: Vec<feature_flags::Model>) -> Self {
        let mut flags = Self::default();
        for row in rows {
            let scope = match ScopeType::from_str(&row.scope_type) {
                Ok(scope) => scope,
                Err(err) => {
                    warn!(flag = %row.feature_key, error = %err, "Ignoring flag row");
                    continue;
                }
            };
            let entry = flags.rows.entry(row.feature_key.clone()).or_default();
            match scope {
                ScopeType::System => entry.system = Some(row),
                ScopeType::Organization => entry.organization = Some(row),
                ScopeType::Platform => {
                    if extract_platform(&row.feature_key) == row.scope_id.as_deref() {
                        entry.platform = Some(row.value);
                    }
                }
            }
        }
        flags.rows.retain(|_, rows| rows.system.is_some() || rows.organization.is_some());
        flags
    }

    fn get(&self, key: &str) -> Result<&ScopedRows, FeatureFlagError> {
        self.rows
            .get(key)
            .ok_or_else(|| FeatureFlagError::NotFound(key.to_string()))
    }

    fn effective(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.rows
            .get(key)
            .is_some_and(|rows| rows.resolution().resolve(now))
    }

    fn is_outranked(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.rows
            .get(key)
            .is_some_and(|rows| rows.resolution().outranking_org_row(now).is_some())
    }

    fn effective_map(&self, now: DateTime<Utc>) -> HashMap<String, bool> {
        self.rows
            .iter()
            .map(|(key, rows)| (key.clone(), rows.resolution().resolve(now)))
            .collect()
    }

    fn views(&self, now: DateTime<Utc>) -> Vec<FlagView> {
        self.rows
            .iter()
            .map(|(key, rows)| {
                let mut view =
                    FlagView::new(key, &rows.metadata(), rows.resolution().resolve(now));
                if let Some(row) = rows.deciding_row() {
                    view.version = row.version;
                    view.last_updated = Some(row.updated_at.with_timezone(&Utc));
                }
                view
            })
            .collect()
    }
}

/// Feature flag repository with effective-value caching.
#[derive(Clone)]
pub struct FeatureFlagRepository {
    db: DatabaseConnection,
    cache: FlagCache,
}

impl FeatureFlagRepository {
    /// Creates a repository sharing `cache` with other handles.
    #[must_use]
    pub const fn new(db: DatabaseConnection, cache: FlagCache) -> Self {
        Self { db, cache }
    }

    /// The effective-value cache.
    #[must_use]
    pub const fn cache(&self) -> &FlagCache {
        &self.cache
    }

    async fn load<C: ConnectionTrait>(
        conn: &C,
        org_id: Uuid,
        user_id: Option<Uuid>,
        key: Option<&str>,
    ) -> Result<OrgFlags, FeatureFlagError> {
        let scope = Condition::any()
            .add(feature_flags::Column::ScopeType.eq(ScopeType::System.as_str()))
            .add(feature_flags::Column::ScopeType.eq(ScopeType::Platform.as_str()))
            .add(
                Condition::all()
                    .add(feature_flags::Column::ScopeType.eq(ScopeType::Organization.as_str()))
                    .add(feature_flags::Column::ScopeId.eq(org_id.to_string())),
            );
        let mut query = feature_flags::Entity::find().filter(scope);
        if let Some(key) = key {
            query = query.filter(feature_flags::Column::FeatureKey.eq(key));
        }
        let rows = query.all(conn).await.map_err(db_err)?;

        let flag_keys: HashMap<Uuid, String> = rows
            .iter()
            .map(|row| (row.id, row.feature_key.clone()))
            .collect();
        let mut flags = OrgFlags::from_rows(rows);

        let mut targets = Condition::any().add(
            Condition::all()
                .add(feature_flag_overrides::Column::TargetType.eq(ORGANIZATION_TARGET))
                .add(feature_flag_overrides::Column::TargetId.eq(org_id)),
        );
        if let Some(user_id) = user_id {
            targets = targets.add(
                Condition::all()
                    .add(feature_flag_overrides::Column::TargetType.eq(USER_TARGET))
                    .add(feature_flag_overrides::Column::TargetId.eq(user_id)),
            );
        }
        let overrides = feature_flag_overrides::Entity::find()
            .filter(feature_flag_overrides::Column::FeatureFlagId.is_in(flag_keys.keys().copied()))
            .filter(targets)
            .all(conn)
            .await
            .map_err(db_err)?;

        for row in overrides {
            let Some(rows) = flag_keys
                .get(&row.feature_flag_id)
                .and_then(|key| flags.rows.get_mut(key))
            else {
                continue;
            };
            let value = OverrideValue {
                value: row.value,
                expires_at: row.expires_at.map(|at| at.with_timezone(&Utc)),
            };
            if row.target_type == USER_TARGET {
                rows.user_override = Some(value);
            } else {
                rows.org_override = Some(value);
            }
        }

        Ok(flags)
    }

    /// Lists the flags of `org_id` matching `filter`, with stats and categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the flags cannot be loaded.
    pub async fn list(&self, org_id: Uuid, filter: &FlagFilter) -> Result<FlagList, FeatureFlagError> {
        let now = Utc::now();
        let views = Self::load(&self.db, org_id, None, None).await?.views(now);
        let stats = FlagStats::from_flags(&views);
        let categories: BTreeSet<String> = views.iter().map(|f| f.category.clone()).collect();

        Ok(FlagList {
            flags: views.into_iter().filter(|f| filter.matches(f)).collect(),
            stats,
            categories: categories.into_iter().collect(),
        })
    }

    /// Effective value of `key` for an organization and optionally a user.
    ///
    /// Unknown flags are disabled. Results are cached until the flag is
    /// written or the entry expires.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag rows cannot be loaded.
    pub async fn effective(
        &self,
        key: &str,
        org_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<bool, FeatureFlagError> {
        if let Some(value) = self.cache.get(key, Some(org_id), user_id) {
            return Ok(value);
        }
        let value = Self::load(&self.db, org_id, user_id, Some(key))
            .await?
            .effective(key, Utc::now());
        self.cache.insert(key, Some(org_id), user_id, value);
        Ok(value)
    }

    /// Sets the organization value of `key`.
    ///
    /// Enabling checks that every dependency is enabled for the organization.
    /// Requesting the current effective value is a no-op reported with
    /// `changed: false`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the flag does not exist
    /// - `DependencyNotMet` if enabling and a prerequisite is disabled
    /// - `Overridden` if a platform row or organization override decides the
    ///   flag, so the write could not change it
    /// - `Conflict` if the row changed concurrently
    pub async fn toggle(
        &self,
        org_id: Uuid,
        key: &str,
        enabled: bool,
    ) -> Result<ToggleOutcome, FeatureFlagError> {
        let now = Utc::now();
        let flags = Self::load(&self.db, org_id, None, None).await?;
        let rows = flags.get(key)?;
        let metadata = rows.metadata();

        if enabled {
            FeatureFlagRules::check_dependencies(key, &metadata.dependencies, |dep| {
                flags.effective(dep, now)
            })?;
        }

        if flags.effective(key, now) == enabled {
            debug!(org_id = %org_id, flag = key, enabled, "Toggle is a no-op");
            let row = rows.deciding_row();
            return Ok(ToggleOutcome {
                flag_key: key.to_string(),
                enabled,
                changed: false,
                requires_restart: metadata.requires_restart,
                version: row.map_or(0, |r| r.version),
                last_updated: row.map_or(now, |r| r.updated_at.with_timezone(&Utc)),
            });
        }

        if let Some(by) = rows.resolution().outranking_org_row(now) {
            return Err(FeatureFlagError::Overridden {
                flag: key.to_string(),
                requested: enabled,
                by,
            });
        }

        let version = Self::write_org_value(&self.db, org_id, key, rows, enabled, now).await?;
        self.cache.invalidate_flag(key);

        info!(org_id = %org_id, flag = key, enabled, version, "Feature flag toggled");
        Ok(ToggleOutcome {
            flag_key: key.to_string(),
            enabled,
            changed: true,
            requires_restart: metadata.requires_restart,
            version,
            last_updated: now,
        })
    }

    /// Writes the organization row, returning the new version.
    async fn write_org_value<C: ConnectionTrait>(
        conn: &C,
        org_id: Uuid,
        key: &str,
        rows: &ScopedRows,
        enabled: bool,
        now: DateTime<Utc>,
    ) -> Result<i32, FeatureFlagError> {
        if let Some(row) = &rows.organization {
            let result = feature_flags::Entity::update_many()
                .col_expr(feature_flags::Column::Value, Expr::value(enabled))
                .col_expr(feature_flags::Column::Version, Expr::value(row.version + 1))
                .col_expr(
                    feature_flags::Column::UpdatedAt,
                    Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(now)),
                )
                .filter(feature_flags::Column::Id.eq(row.id))
                .filter(feature_flags::Column::Version.eq(row.version))
                .exec(conn)
                .await
                .map_err(db_err)?;

            if result.rows_affected == 0 {
                return Err(FeatureFlagError::Conflict(key.to_string()));
            }
            return Ok(row.version + 1);
        }

        let metadata = rows
            .system
            .as_ref()
            .map_or_else(|| serde_json::json!({}), |row| row.metadata.clone());
        let inserted = feature_flags::ActiveModel {
            id: Set(Uuid::now_v7()),
            feature_key: Set(key.to_string()),
            scope_type: Set(ScopeType::Organization.as_str().to_string()),
            scope_id: Set(Some(org_id.to_string())),
            value: Set(enabled),
            metadata: Set(metadata),
            version: Set(1),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(conn)
        .await;

        match inserted {
            Ok(row) => Ok(row.version),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(FeatureFlagError::Conflict(key.to_string()))
            }
            Err(err) => Err(db_err(err)),
        }
    }

    /// Enables every visible flag, prerequisites first.
    ///
    /// Flags whose prerequisites stay disabled are reported as skipped, and
    /// flags kept disabled by a platform row or organization override as
    /// overridden. All writes commit together.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if any row changed concurrently; nothing is written
    /// in that case.
    pub async fn enable_all(
        &self,
        org_id: Uuid,
        filter: &FlagFilter,
    ) -> Result<BulkOutcome, FeatureFlagError> {
        let now = Utc::now();
        let flags = Self::load(&self.db, org_id, None, None).await?;
        let visible: Vec<FlagView> = flags
            .views(now)
            .into_iter()
            .filter(|f| filter.matches(f))
            .collect();
        let plan = FeatureFlagRules::plan_enable_all(&visible, &flags.effective_map(now), |key| {
            flags.is_outranked(key, now)
        });

        let outcome = self.apply(org_id, &flags, &visible, plan, true, now).await?;
        info!(
            org_id = %org_id,
            changed = outcome.changed.len(),
            skipped = outcome.skipped.len(),
            overridden = outcome.overridden.len(),
            "Enabled all feature flags"
        );
        Ok(outcome)
    }

    /// Disables every visible flag not kept enabled by a higher-precedence
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if any row changed concurrently; nothing is written
    /// in that case.
    pub async fn disable_all(
        &self,
        org_id: Uuid,
        filter: &FlagFilter,
    ) -> Result<BulkOutcome, FeatureFlagError> {
        let now = Utc::now();
        let flags = Self::load(&self.db, org_id, None, None).await?;
        let visible: Vec<FlagView> = flags
            .views(now)
            .into_iter()
            .filter(|f| filter.matches(f))
            .collect();
        let plan = FeatureFlagRules::plan_disable_all(&visible, |key| flags.is_outranked(key, now));

        let outcome = self.apply(org_id, &flags, &visible, plan, false, now).await?;
        info!(org_id = %org_id, changed = outcome.changed.len(), "Disabled all feature flags");
        Ok(outcome)
    }

    async fn apply(
        &self,
        org_id: Uuid,
        flags: &OrgFlags,
        visible: &[FlagView],
        plan: cmis_core::feature_flag::BulkPlan,
        enabled: bool,
        now: DateTime<Utc>,
    ) -> Result<BulkOutcome, FeatureFlagError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        for key in &plan.apply {
            let rows = flags.get(key)?;
            Self::write_org_value(&txn, org_id, key, rows, enabled, now).await?;
        }
        txn.commit().await.map_err(db_err)?;

        for key in &plan.apply {
            self.cache.invalidate_flag(key);
        }

        let requires_restart = visible
            .iter()
            .any(|f| f.requires_restart && plan.apply.contains(&f.flag_key));
        Ok(BulkOutcome {
            changed: plan.apply,
            unchanged: plan.unchanged,
            skipped: plan.skipped,
            overridden: plan.overridden,
            requires_restart,
        })
    }

    /// Effective `feature -> platform -> enabled` matrix for an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the flags cannot be loaded.
    pub async fn feature_matrix(&self, org_id: Uuid) -> Result<FeatureMatrix, FeatureFlagError> {
        let now = Utc::now();
        let flags = Self::load(&self.db, org_id, None, None).await?;
        Ok(FeatureFlagRules::feature_matrix(&PLATFORM_FEATURES, |key| {
            flags.effective(key, now)
        }))
    }

    /// Platforms with `feature` enabled for an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the flags cannot be loaded.
    pub async fn enabled_platforms(
        &self,
        org_id: Uuid,
        feature: &str,
    ) -> Result<Vec<&'static str>, FeatureFlagError> {
        let now = Utc::now();
        let flags = Self::load(&self.db, org_id, None, None).await?;
        Ok(FeatureFlagRules::enabled_platforms(feature, |key| {
            flags.effective(key, now)
        }))
    }

    /// Attaches an override to the system row of `key`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the flag has no system row.
    pub async fn set_override(
        &self,
        key: &str,
        input: OverrideInput,
    ) -> Result<feature_flag_overrides::Model, FeatureFlagError> {
        let system = feature_flags::Entity::find()
            .filter(feature_flags::Column::FeatureKey.eq(key))
            .filter(feature_flags::Column::ScopeType.eq(ScopeType::System.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| FeatureFlagError::NotFound(key.to_string()))?;

        let target = input.target_type.as_str();
        if target != USER_TARGET && target != ORGANIZATION_TARGET {
            return Err(FeatureFlagError::InvalidScope(input.target_type));
        }

        let row = feature_flag_overrides::ActiveModel {
            id: Set(Uuid::now_v7()),
            feature_flag_id: Set(system.id),
            target_type: Set(input.target_type),
            target_id: Set(input.target_id),
            value: Set(input.value),
            reason: Set(input.reason),
            expires_at: Set(input.expires_at.map(Into::into)),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        self.cache.invalidate_flag(key);
        info!(flag = key, target = %row.target_type, value = row.value, "Feature flag override set");
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(key: &str, scope: ScopeType, scope_id: Option<&str>, value: bool) -> feature_flags::Model {
        let now = Utc::now().into();
        feature_flags::Model {
            id: Uuid::now_v7(),
            feature_key: key.to_string(),
            scope_type: scope.as_str().to_string(),
            scope_id: scope_id.map(str::to_string),
            value,
            metadata: serde_json::json!({ "category": "core" }),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_org_row_beats_system_row() {
        let flags = OrgFlags::from_rows(vec![
            row("ai.enabled", ScopeType::System, None, false),
            row("ai.enabled", ScopeType::Organization, Some("org"), true),
        ]);
        assert!(flags.effective("ai.enabled", Utc::now()));
    }

    #[test]
    fn test_platform_row_applies_only_to_its_platform() {
        let flags = OrgFlags::from_rows(vec![
            row("scheduling.meta.enabled", ScopeType::System, None, true),
            row("scheduling.meta.enabled", ScopeType::Platform, Some("google"), false),
            row("scheduling.google.enabled", ScopeType::System, None, true),
            row("scheduling.google.enabled", ScopeType::Platform, Some("google"), false),
        ]);
        let now = Utc::now();
        assert!(flags.effective("scheduling.meta.enabled", now));
        assert!(!flags.effective("scheduling.google.enabled", now));
        assert!(!flags.is_outranked("scheduling.meta.enabled", now));
        assert!(flags.is_outranked("scheduling.google.enabled", now));
    }

    #[test]
    fn test_expired_org_override_falls_back_to_row() {
        let mut flags = OrgFlags::from_rows(vec![row("ai.enabled", ScopeType::System, None, true)]);
        let now = Utc::now();
        if let Some(rows) = flags.rows.get_mut("ai.enabled") {
            rows.org_override = Some(OverrideValue {
                value: false,
                expires_at: Some(now - Duration::minutes(1)),
            });
        }
        assert!(flags.effective("ai.enabled", now));
    }

    #[test]
    fn test_active_org_override_outranks_org_row() {
        let mut flags = OrgFlags::from_rows(vec![
            row("ai.enabled", ScopeType::System, None, false),
            row("ai.enabled", ScopeType::Organization, Some("org"), true),
        ]);
        let now = Utc::now();
        assert!(!flags.is_outranked("ai.enabled", now));
        if let Some(rows) = flags.rows.get_mut("ai.enabled") {
            rows.org_override = Some(OverrideValue {
                value: false,
                expires_at: None,
            });
        }
        assert!(!flags.effective("ai.enabled", now));
        assert!(flags.is_outranked("ai.enabled", now));
    }

    #[test]
    fn test_unknown_scope_rows_are_ignored() {
        let mut bad = row("ai.enabled", ScopeType::System, None, true);
        bad.scope_type = "team".into();
        let flags = OrgFlags::from_rows(vec![bad]);
        assert!(flags.rows.is_empty());
        assert!(matches!(flags.get("ai.enabled"), Err(FeatureFlagError::NotFound(_))));
    }

    #[test]
    fn test_view_carries_org_row_version() {
        let mut org = row("ai.enabled", ScopeType::Organization, Some("org"), true);
        org.version = 4;
        let flags = OrgFlags::from_rows(vec![row("ai.enabled", ScopeType::System, None, false), org]);
        let views = flags.views(Utc::now());
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].version, 4);
        assert!(views[0].is_enabled);
        assert_eq!(views[0].category, "core");
    }
}
