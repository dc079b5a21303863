//! Integration tests for the seed orchestrator and the standard plan.
//!
//! Every test runs against a fresh in-memory SQLite database.

mod common;

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use cmis_core::catalog::demo::CAMPAIGNS;
use cmis_core::catalog::{CHANNELS, PERMISSIONS, flag_catalog, format_count, grants_for};
use cmis_core::identity::{IdentityRegistry, MEMBERSHIPS, ORGANIZATIONS, ROLES, USERS};
use cmis_core::seeding::{
    EntityKind, SeedError, StageOutcome, StagePolicy, StepManifest, StepSummary,
};
use cmis_db::entities::{
    campaigns, channel_formats, channels, feature_flags, orgs, permissions, platform_connections,
    role_permissions, roles, user_orgs, users,
};
use cmis_db::seeding::steps::reference::ChannelsStep;
use cmis_db::seeding::{SeedStep, db_error, ledger};
use cmis_db::{SeedContext, SeedOrchestrator, Stage, default_plan};

use common::{context, count, seed, seeder_config, setup_db};

/// Step that fails with a database error.
struct BrokenStep;

#[async_trait]
impl SeedStep for BrokenStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("broken_offerings", &[EntityKind::Offering])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        _ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        txn.execute_unprepared("INSERT INTO no_such_table (id) VALUES (1)")
            .await
            .map_err(|e| db_error("broken_offerings", e))?;
        Ok(StepSummary::default())
    }
}

/// Step that inserts a membership before the user it points at.
struct ChildFirstStep {
    user_id: Uuid,
    dangling: bool,
}

#[async_trait]
impl SeedStep for ChildFirstStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("child_first", &[EntityKind::Membership, EntityKind::User])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = "child_first";
        let now = ctx.timestamp();

        user_orgs::Entity::insert(user_orgs::ActiveModel {
            user_id: Set(self.user_id),
            org_id: Set(ctx.org(step, "TechVision Solutions")?),
            role_id: Set(ctx.role(step, "viewer")?),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .exec_without_returning(txn)
        .await
        .map_err(|e| db_error(step, e))?;

        if !self.dangling {
            users::Entity::insert(users::ActiveModel {
                id: Set(self.user_id),
                email: Set("late@cmis.test".into()),
                name: Set("Late User".into()),
                password_hash: Set(ctx.password_hash().to_string()),
                locale: Set("en".into()),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .exec_without_returning(txn)
            .await
            .map_err(|e| db_error(step, e))?;
        }

        Ok(StepSummary::inserted(2))
    }
}

#[tokio::test]
async fn test_full_seed_on_empty_schema() {
    let db = setup_db().await;

    let report = seed(&db, true).await;

    assert!(report.is_success(), "{report}");
    assert_eq!(report.warnings().count(), 0, "{report}");
    assert_eq!(report.batch, 1);
    assert!(
        report
            .stages
            .iter()
            .all(|s| matches!(s.outcome, StageOutcome::Committed(_)))
    );

    assert_eq!(count(&db, orgs::Entity).await, ORGANIZATIONS.len() as u64);
    assert_eq!(count(&db, users::Entity).await, USERS.len() as u64);
    assert_eq!(count(&db, roles::Entity).await, ROLES.len() as u64);
    assert_eq!(count(&db, permissions::Entity).await, PERMISSIONS.len() as u64);
    assert_eq!(count(&db, user_orgs::Entity).await, MEMBERSHIPS.len() as u64);
    let grants: usize = ROLES.iter().map(|r| grants_for(r.code).len()).sum();
    assert_eq!(count(&db, role_permissions::Entity).await, grants as u64);
    assert_eq!(count(&db, feature_flags::Entity).await, flag_catalog().len() as u64);
    assert_eq!(count(&db, campaigns::Entity).await, CAMPAIGNS.len() as u64);
}

#[tokio::test]
async fn test_reference_reseed_writes_same_rows() {
    let db = setup_db().await;
    let ctx = context(seeder_config(false));
    let plan = || vec![Stage::required("reference").step(ChannelsStep)];

    let first = SeedOrchestrator::new(&db, &ctx).run(&plan()).await.unwrap();
    assert!(first.is_success(), "{first}");
    let before: Vec<Uuid> = channels::Entity::find()
        .order_by_asc(channels::Column::Id)
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(before.len(), CHANNELS.len());

    let second = SeedOrchestrator::new(&db, &ctx).run(&plan()).await.unwrap();
    assert!(second.is_success(), "{second}");
    let totals = second.totals();
    assert_eq!(totals.deleted, (CHANNELS.len() + format_count()) as u64);
    assert_eq!(totals.inserted, (CHANNELS.len() + format_count()) as u64);

    let after: Vec<Uuid> = channels::Entity::find()
        .order_by_asc(channels::Column::Id)
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(before, after);

    let formats = channel_formats::Entity::find().all(&db).await.unwrap();
    assert_eq!(formats.len(), format_count());
    assert!(formats.iter().all(|f| after.contains(&f.channel_id)));
}

#[tokio::test]
async fn test_registry_ids_match_database() {
    let db = setup_db().await;
    seed(&db, false).await;

    let registry = IdentityRegistry::from_constants().unwrap();
    let other = IdentityRegistry::from_constants().unwrap();
    let techvision = registry.org("TechVision Solutions").unwrap();
    assert_eq!(techvision, registry.org("TechVision Solutions").unwrap());
    assert_eq!(techvision, other.org("TechVision Solutions").unwrap());

    let row = orgs::Entity::find_by_id(techvision.into_inner())
        .one(&db)
        .await
        .unwrap()
        .expect("organization seeded under its registry id");
    assert_eq!(row.name, "TechVision Solutions");
}

#[tokio::test]
async fn test_reseed_is_idempotent() {
    let db = setup_db().await;
    seed(&db, false).await;

    let users_before = users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(&db)
        .await
        .unwrap();
    let counts_before = (
        count(&db, orgs::Entity).await,
        count(&db, role_permissions::Entity).await,
        count(&db, user_orgs::Entity).await,
        count(&db, feature_flags::Entity).await,
    );

    let report = seed(&db, false).await;
    assert!(report.is_success(), "{report}");
    assert_eq!(report.batch, 2);

    let users_after = users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(&db)
        .await
        .unwrap();
    let counts_after = (
        count(&db, orgs::Entity).await,
        count(&db, role_permissions::Entity).await,
        count(&db, user_orgs::Entity).await,
        count(&db, feature_flags::Entity).await,
    );

    assert_eq!(counts_before, counts_after);
    assert_eq!(users_before.len(), users_after.len());
    for (before, after) in users_before.iter().zip(&users_after) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.created_at, after.created_at);
        // A fresh context hashes with a fresh salt; the stored hash must survive.
        assert_eq!(before.password_hash, after.password_hash);
    }
}

#[tokio::test]
async fn test_reseed_preserves_runtime_flag_values() {
    let db = setup_db().await;
    seed(&db, false).await;

    let key = "scheduling.meta.enabled";
    let system = feature_flags::Entity::find()
        .filter(feature_flags::Column::FeatureKey.eq(key))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(system.value);

    feature_flags::Entity::update_many()
        .col_expr(feature_flags::Column::Value, sea_orm::sea_query::Expr::value(false))
        .col_expr(feature_flags::Column::Version, sea_orm::sea_query::Expr::value(7))
        .filter(feature_flags::Column::Id.eq(system.id))
        .exec(&db)
        .await
        .unwrap();

    seed(&db, false).await;

    let reseeded = feature_flags::Entity::find_by_id(system.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(!reseeded.value);
    assert_eq!(reseeded.version, 7);
    assert_eq!(reseeded.metadata, system.metadata);
}

#[tokio::test]
async fn test_failing_optional_stage_keeps_required_data() {
    let db = setup_db().await;
    let config = seeder_config(false);
    let ctx = context(config.clone());

    let mut plan = default_plan(&config);
    plan.push(Stage::optional("demo_broken").step(BrokenStep));

    let report = SeedOrchestrator::new(&db, &ctx).run(&plan).await.unwrap();

    assert!(report.is_success(), "{report}");
    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].0, "demo_broken");
    assert!(matches!(warnings[0].1, SeedError::Database { step, .. } if step == "broken_offerings"));

    assert_eq!(count(&db, orgs::Entity).await, ORGANIZATIONS.len() as u64);
    assert_eq!(count(&db, users::Entity).await, USERS.len() as u64);
    assert_eq!(count(&db, roles::Entity).await, ROLES.len() as u64);

    let registry = IdentityRegistry::from_constants().unwrap();
    let sarah = registry.user("sarah@techvision.com").unwrap().into_inner();
    let membership = user_orgs::Entity::find()
        .filter(user_orgs::Column::UserId.eq(sarah))
        .one(&db)
        .await
        .unwrap()
        .expect("membership seeded");
    assert_eq!(
        membership.org_id,
        registry.org("TechVision Solutions").unwrap().into_inner()
    );
    assert_eq!(
        membership.role_id,
        registry.role("marketing_manager").unwrap().into_inner()
    );

    let recorded: Vec<String> = ledger::history(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|run| run.name)
        .collect();
    assert!(!recorded.contains(&"demo_broken".to_string()));
}

#[tokio::test]
async fn test_fail_fast_promotes_optional_failure() {
    let db = setup_db().await;
    let mut config = seeder_config(false);
    config.fail_fast = true;
    let ctx = context(config.clone());

    let mut plan = default_plan(&config);
    plan.push(Stage::optional("demo_broken").step(BrokenStep));

    let report = SeedOrchestrator::new(&db, &ctx).run(&plan).await.unwrap();

    assert!(!report.is_success());
    let (stage, err) = report.required_failure().unwrap();
    assert_eq!(stage, "demo_broken");
    assert_eq!(err.exit_code(), 1);
    assert!(report.stages.iter().all(|s| s.policy == StagePolicy::Required));
}

#[tokio::test]
async fn test_platform_connection_upsert_twice() {
    let db = setup_db().await;
    seed(&db, false).await;

    let registry = IdentityRegistry::from_constants().unwrap();
    let techvision = registry.org("TechVision Solutions").unwrap().into_inner();
    let find = || {
        platform_connections::Entity::find()
            .filter(platform_connections::Column::OrgId.eq(techvision))
            .filter(platform_connections::Column::Platform.eq("meta"))
            .all(&db)
    };
    let first = find().await.unwrap();
    assert_eq!(first.len(), 1);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    seed(&db, false).await;

    let second = find().await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, first[0].id);
    assert_eq!(second[0].created_at, first[0].created_at);
    assert!(second[0].updated_at > first[0].updated_at);
}

#[tokio::test]
async fn test_run_once_stages_are_skipped_on_rerun() {
    let db = setup_db().await;
    let first = seed(&db, true).await;
    assert!(first.is_success(), "{first}");

    let second = seed(&db, true).await;
    assert!(second.is_success(), "{second}");

    let outcomes: HashMap<&str, &StageOutcome> = second
        .stages
        .iter()
        .map(|s| (s.stage.as_str(), &s.outcome))
        .collect();
    assert_eq!(outcomes["demo_catalog"], &StageOutcome::Skipped);
    assert_eq!(outcomes["demo_content"], &StageOutcome::Skipped);
    assert!(matches!(outcomes["identity"], StageOutcome::Committed(_)));
    assert_eq!(count(&db, campaigns::Entity).await, CAMPAIGNS.len() as u64);

    let history = ledger::history(&db).await.unwrap();
    assert!(history.iter().all(|run| run.batch == 1 || run.batch == 2));
    assert_eq!(
        history.iter().filter(|run| run.name == "demo_catalog").count(),
        1
    );
}

#[tokio::test]
async fn test_out_of_order_plan_rejected_before_io() {
    // No migrations: any query would fail with a database error.
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    let ctx = context(seeder_config(false));
    let plan = vec![Stage::required("access").step(cmis_db::seeding::steps::identity::MembershipsStep)];

    let err = SeedOrchestrator::new(&db, &ctx).run(&plan).await.unwrap_err();

    assert!(matches!(err, SeedError::ForeignKeyViolation { ref step, .. } if step == "memberships"));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_constraints_are_checked_at_commit() {
    let db = setup_db().await;
    seed(&db, false).await;
    let ctx = context(seeder_config(false));

    let ordered = vec![Stage::required("late_user").step(ChildFirstStep {
        user_id: Uuid::now_v7(),
        dangling: false,
    })];
    let report = SeedOrchestrator::new(&db, &ctx)
        .assuming_present(EntityKind::ALL)
        .run(&ordered)
        .await
        .unwrap();
    assert!(report.is_success(), "{report}");

    let dangling_user = Uuid::now_v7();
    let dangling = vec![Stage::required("dangling_membership").step(ChildFirstStep {
        user_id: dangling_user,
        dangling: true,
    })];
    let report = SeedOrchestrator::new(&db, &ctx)
        .assuming_present(EntityKind::ALL)
        .run(&dangling)
        .await
        .unwrap();

    let (stage, err) = report.required_failure().expect("commit must fail");
    assert_eq!(stage, "dangling_membership");
    assert!(
        matches!(err, SeedError::ForeignKeyViolation { reference, .. } if reference.contains("users")),
        "{err}"
    );
    let rolled_back = user_orgs::Entity::find()
        .filter(user_orgs::Column::UserId.eq(dangling_user))
        .all(&db)
        .await
        .unwrap();
    assert!(rolled_back.is_empty());
}
