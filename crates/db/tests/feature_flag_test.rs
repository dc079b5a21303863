//! Integration tests for the feature flag repository.
//!
//! Flags are seeded by the standard plan, then read and written the way the
//! admin API does.

mod common;

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use cmis_core::feature_flag::{
    FeatureFlagError, FlagCache, FlagFilter, Precedence, ScopeType, StatusFilter,
};
use cmis_core::identity::{ARABIC_MARKETING_ORG_ID, TECHVISION_ORG_ID};
use cmis_db::FeatureFlagRepository;
use cmis_db::entities::feature_flags;
use cmis_db::repositories::OverrideInput;
use cmis_db::repositories::feature_flag::{ORGANIZATION_TARGET, USER_TARGET};

use common::{seed, setup_db};

async fn seeded_repo() -> FeatureFlagRepository {
    let db = setup_db().await;
    let report = seed(&db, false).await;
    assert!(report.is_success(), "{report}");
    FeatureFlagRepository::new(db, FlagCache::new())
}

async fn seeded_db_and_repo() -> (DatabaseConnection, FeatureFlagRepository) {
    let db = setup_db().await;
    let report = seed(&db, false).await;
    assert!(report.is_success(), "{report}");
    (db.clone(), FeatureFlagRepository::new(db, FlagCache::new()))
}

async fn org_override(repo: &FeatureFlagRepository, key: &str, value: bool) {
    repo.set_override(
        key,
        OverrideInput {
            target_type: ORGANIZATION_TARGET.to_string(),
            target_id: TECHVISION_ORG_ID,
            value,
            reason: Some("support escalation".into()),
            expires_at: None,
        },
    )
    .await
    .unwrap();
}

async fn platform_row(db: &DatabaseConnection, key: &str, platform: &str, value: bool) {
    let now = Utc::now();
    feature_flags::ActiveModel {
        id: Set(Uuid::now_v7()),
        feature_key: Set(key.to_string()),
        scope_type: Set(ScopeType::Platform.as_str().to_string()),
        scope_id: Set(Some(platform.to_string())),
        value: Set(value),
        metadata: Set(serde_json::json!({})),
        version: Set(1),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .unwrap();
}

async fn org_row_count(db: &DatabaseConnection, key: &str) -> usize {
    feature_flags::Entity::find()
        .filter(feature_flags::Column::FeatureKey.eq(key))
        .filter(feature_flags::Column::ScopeType.eq(ScopeType::Organization.as_str()))
        .all(db)
        .await
        .unwrap()
        .len()
}

fn category(name: &str) -> FlagFilter {
    FlagFilter {
        category: Some(name.to_string()),
        status: StatusFilter::All,
    }
}

#[tokio::test]
async fn test_toggle_rejected_when_dependency_disabled() {
    let repo = seeded_repo().await;
    let key = "paid_campaigns.google.enabled";

    let err = repo.toggle(TECHVISION_ORG_ID, key, true).await.unwrap_err();

    assert_eq!(
        err,
        FeatureFlagError::DependencyNotMet {
            flag: key.to_string(),
            missing: vec!["paid_campaigns.meta.enabled".to_string()],
        }
    );
    assert_eq!(err.status_code(), 422);
    assert!(!repo.effective(key, TECHVISION_ORG_ID, None).await.unwrap());
}

#[tokio::test]
async fn test_toggle_after_enabling_dependency() {
    let repo = seeded_repo().await;

    let meta = repo
        .toggle(TECHVISION_ORG_ID, "paid_campaigns.meta.enabled", true)
        .await
        .unwrap();
    assert!(meta.changed);
    assert_eq!(meta.version, 1);

    let google = repo
        .toggle(TECHVISION_ORG_ID, "paid_campaigns.google.enabled", true)
        .await
        .unwrap();
    assert!(google.enabled);
    assert!(google.changed);

    // Other organizations still see the system value.
    assert!(
        !repo
            .effective("paid_campaigns.google.enabled", ARABIC_MARKETING_ORG_ID, None)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_toggle_bumps_version_and_repeat_is_noop() {
    let repo = seeded_repo().await;
    let key = "ai.content_generation";

    let first = repo.toggle(TECHVISION_ORG_ID, key, true).await.unwrap();
    assert_eq!(first.version, 1);

    let repeat = repo.toggle(TECHVISION_ORG_ID, key, true).await.unwrap();
    assert!(!repeat.changed);
    assert_eq!(repeat.version, 1);

    let off = repo.toggle(TECHVISION_ORG_ID, key, false).await.unwrap();
    assert!(off.changed);
    assert_eq!(off.version, 2);
    assert!(off.last_updated >= first.last_updated);
}

#[tokio::test]
async fn test_toggle_unknown_flag() {
    let repo = seeded_repo().await;
    let err = repo
        .toggle(TECHVISION_ORG_ID, "does.not.exist", true)
        .await
        .unwrap_err();
    assert_eq!(err, FeatureFlagError::NotFound("does.not.exist".into()));
}

#[tokio::test]
async fn test_toggle_invalidates_cached_value() {
    let repo = seeded_repo().await;
    let key = "ai.semantic_search";

    assert!(!repo.effective(key, TECHVISION_ORG_ID, None).await.unwrap());
    assert_eq!(repo.cache().get(key, Some(TECHVISION_ORG_ID), None), Some(false));

    let outcome = repo.toggle(TECHVISION_ORG_ID, key, true).await.unwrap();
    assert!(outcome.requires_restart);
    repo.cache().run_pending_tasks();

    assert!(repo.effective(key, TECHVISION_ORG_ID, None).await.unwrap());
}

#[tokio::test]
async fn test_list_filters_and_counts() {
    let repo = seeded_repo().await;

    let all = repo.list(TECHVISION_ORG_ID, &FlagFilter::default()).await.unwrap();
    let ai = repo.list(TECHVISION_ORG_ID, &category("ai")).await.unwrap();
    let enabled = repo
        .list(
            TECHVISION_ORG_ID,
            &FlagFilter {
                category: None,
                status: StatusFilter::Enabled,
            },
        )
        .await
        .unwrap();

    assert_eq!(ai.flags.len(), 3);
    assert!(ai.flags.iter().all(|f| f.category == "ai"));
    assert_eq!(ai.stats, all.stats);
    assert!(all.categories.contains(&"integrations".to_string()));
    assert!(enabled.flags.iter().all(|f| f.is_enabled));
    assert_eq!(
        all.stats.disabled,
        all.flags.iter().filter(|f| !f.is_enabled).count()
    );
}

#[tokio::test]
async fn test_enable_all_orders_dependencies_and_skips_blocked() {
    let repo = seeded_repo().await;

    let integrations = repo
        .enable_all(TECHVISION_ORG_ID, &category("integrations"))
        .await
        .unwrap();
    assert_eq!(integrations.changed[0], "paid_campaigns.meta.enabled");
    assert!(integrations.skipped.is_empty());

    let automation = repo
        .enable_all(TECHVISION_ORG_ID, &category("automation"))
        .await
        .unwrap();
    assert_eq!(automation.changed, vec!["automation.workflows".to_string()]);
    assert_eq!(automation.unchanged, vec!["scheduling.meta.enabled".to_string()]);
    assert_eq!(automation.skipped.len(), 5);
    let google = automation
        .skipped
        .iter()
        .find(|s| s.flag_key == "scheduling.google.enabled")
        .unwrap();
    assert_eq!(google.missing, vec!["organic_posts.google.enabled".to_string()]);
}

#[tokio::test]
async fn test_disable_all_is_idempotent() {
    let repo = seeded_repo().await;

    let first = repo
        .disable_all(TECHVISION_ORG_ID, &FlagFilter::default())
        .await
        .unwrap();
    assert!(!first.changed.is_empty());

    let second = repo
        .disable_all(TECHVISION_ORG_ID, &FlagFilter::default())
        .await
        .unwrap();
    assert!(second.changed.is_empty());

    let matrix = repo.feature_matrix(TECHVISION_ORG_ID).await.unwrap();
    assert!(matrix.values().flat_map(|row| row.values()).all(|enabled| !enabled));

    let other = repo.feature_matrix(ARABIC_MARKETING_ORG_ID).await.unwrap();
    assert!(other["scheduling"]["meta"]);
}

#[tokio::test]
async fn test_feature_matrix_reflects_seeded_values() {
    let repo = seeded_repo().await;

    let matrix = repo.feature_matrix(TECHVISION_ORG_ID).await.unwrap();
    assert!(matrix["organic_posts"]["meta"]);
    assert!(!matrix["paid_campaigns"]["meta"]);
    assert!(!matrix["scheduling"]["tiktok"]);
    assert_eq!(
        repo.enabled_platforms(TECHVISION_ORG_ID, "analytics").await.unwrap(),
        vec!["meta"]
    );
}

#[tokio::test]
async fn test_user_override_beats_org_value_until_expiry() {
    let repo = seeded_repo().await;
    let key = "ai.campaign_generation";
    let user = Uuid::now_v7();

    repo.set_override(
        key,
        OverrideInput {
            target_type: USER_TARGET.to_string(),
            target_id: user,
            value: true,
            reason: Some("beta tester".into()),
            expires_at: Some(Utc::now() + Duration::days(1)),
        },
    )
    .await
    .unwrap();

    assert!(repo.effective(key, TECHVISION_ORG_ID, Some(user)).await.unwrap());
    assert!(
        !repo
            .effective(key, TECHVISION_ORG_ID, Some(Uuid::now_v7()))
            .await
            .unwrap()
    );
    assert!(!repo.effective(key, TECHVISION_ORG_ID, None).await.unwrap());
}

#[tokio::test]
async fn test_override_rejects_unknown_target() {
    let repo = seeded_repo().await;
    let err = repo
        .set_override(
            "ai.content_generation",
            OverrideInput {
                target_type: "team".into(),
                target_id: Uuid::now_v7(),
                value: true,
                reason: None,
                expires_at: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, FeatureFlagError::InvalidScope("team".into()));
}

#[tokio::test]
async fn test_seeding_writes_only_system_rows() {
    let db = setup_db().await;
    seed(&db, false).await;

    let scoped = feature_flags::Entity::find()
        .filter(feature_flags::Column::ScopeType.ne("system"))
        .all(&db)
        .await
        .unwrap();
    assert!(scoped.is_empty());
}

#[tokio::test]
async fn test_toggle_refused_while_org_override_decides() {
    let (db, repo) = seeded_db_and_repo().await;
    let key = "ai.content_generation";
    org_override(&repo, key, true).await;

    for _ in 0..2 {
        let err = repo.toggle(TECHVISION_ORG_ID, key, false).await.unwrap_err();
        assert_eq!(
            err,
            FeatureFlagError::Overridden {
                flag: key.to_string(),
                requested: false,
                by: Precedence::OrganizationOverride,
            }
        );
    }

    assert_eq!(org_row_count(&db, key).await, 0);
    assert!(repo.effective(key, TECHVISION_ORG_ID, None).await.unwrap());

    // Requesting the overridden value is still a no-op.
    let same = repo.toggle(TECHVISION_ORG_ID, key, true).await.unwrap();
    assert!(!same.changed);
}

#[tokio::test]
async fn test_toggle_refused_under_platform_row() {
    let (db, repo) = seeded_db_and_repo().await;
    let key = "paid_campaigns.meta.enabled";
    platform_row(&db, key, "meta", false).await;

    let err = repo.toggle(TECHVISION_ORG_ID, key, true).await.unwrap_err();

    assert_eq!(
        err,
        FeatureFlagError::Overridden {
            flag: key.to_string(),
            requested: true,
            by: Precedence::PlatformRow,
        }
    );
    assert_eq!(org_row_count(&db, key).await, 0);
    assert!(!repo.effective(key, TECHVISION_ORG_ID, None).await.unwrap());
}

#[tokio::test]
async fn test_enable_all_keeps_dependents_of_overridden_flag_disabled() {
    let (db, repo) = seeded_db_and_repo().await;
    let meta = "paid_campaigns.meta.enabled";
    let google = "paid_campaigns.google.enabled";
    org_override(&repo, meta, false).await;

    let outcome = repo
        .enable_all(TECHVISION_ORG_ID, &category("integrations"))
        .await
        .unwrap();

    assert_eq!(outcome.overridden, vec![meta.to_string()]);
    assert!(!outcome.changed.contains(&meta.to_string()));
    assert!(!outcome.changed.contains(&google.to_string()));
    let skipped = outcome
        .skipped
        .iter()
        .find(|s| s.flag_key == google)
        .unwrap();
    assert_eq!(skipped.missing, vec![meta.to_string()]);

    assert_eq!(org_row_count(&db, meta).await, 0);
    assert!(!repo.effective(meta, TECHVISION_ORG_ID, None).await.unwrap());
    assert!(!repo.effective(google, TECHVISION_ORG_ID, None).await.unwrap());
}

#[tokio::test]
async fn test_enable_all_under_platform_row() {
    let (db, repo) = seeded_db_and_repo().await;
    let meta = "paid_campaigns.meta.enabled";
    platform_row(&db, meta, "meta", false).await;

    let outcome = repo
        .enable_all(TECHVISION_ORG_ID, &category("integrations"))
        .await
        .unwrap();

    assert_eq!(outcome.overridden, vec![meta.to_string()]);
    assert!(
        !repo
            .effective("paid_campaigns.google.enabled", TECHVISION_ORG_ID, None)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_disable_all_leaves_platform_enabled_flag() {
    let (db, repo) = seeded_db_and_repo().await;
    let key = "scheduling.meta.enabled";
    platform_row(&db, key, "meta", true).await;

    let outcome = repo
        .disable_all(TECHVISION_ORG_ID, &FlagFilter::default())
        .await
        .unwrap();

    assert_eq!(outcome.overridden, vec![key.to_string()]);
    assert!(!outcome.changed.contains(&key.to_string()));
    let matrix = repo.feature_matrix(TECHVISION_ORG_ID).await.unwrap();
    assert!(matrix["scheduling"]["meta"]);
}

#[tokio::test]
async fn test_second_system_row_for_a_key_is_rejected() {
    let (db, _repo) = seeded_db_and_repo().await;
    let now = Utc::now();

    let err = feature_flags::ActiveModel {
        id: Set(Uuid::now_v7()),
        feature_key: Set("scheduling.meta.enabled".to_string()),
        scope_type: Set(ScopeType::System.as_str().to_string()),
        scope_id: Set(None),
        value: Set(false),
        metadata: Set(serde_json::json!({})),
        version: Set(1),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&db)
    .await
    .unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
    let system_rows = feature_flags::Entity::find()
        .filter(feature_flags::Column::FeatureKey.eq("scheduling.meta.enabled"))
        .filter(feature_flags::Column::ScopeType.eq(ScopeType::System.as_str()))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(system_rows.len(), 1);
}
