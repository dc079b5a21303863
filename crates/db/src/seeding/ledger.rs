//! The `seed_runs` ledger.
//!
//! One row per committed stage per run. The row is written inside the stage
//! transaction so a rolled-back stage leaves no trace.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::seed_runs;

/// Highest recorded batch, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn last_batch<C: ConnectionTrait>(conn: &C) -> Result<Option<i32>, DbErr> {
    Ok(seed_runs::Entity::find()
        .order_by_desc(seed_runs::Column::Batch)
        .one(conn)
        .await?
        .map(|run| run.batch))
}

/// Whether `stage` has ever committed.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn is_recorded<C: ConnectionTrait>(conn: &C, stage: &str) -> Result<bool, DbErr> {
    let count = seed_runs::Entity::find()
        .filter(seed_runs::Column::Name.eq(stage))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Records a committed stage.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    stage: &str,
    batch: i32,
    at: DateTime<Utc>,
) -> Result<(), DbErr> {
    seed_runs::ActiveModel {
        id: NotSet,
        name: Set(stage.to_string()),
        batch: Set(batch),
        executed_at: Set(at.into()),
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// All ledger rows, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn history<C: ConnectionTrait>(conn: &C) -> Result<Vec<seed_runs::Model>, DbErr> {
    seed_runs::Entity::find()
        .order_by_asc(seed_runs::Column::Id)
        .all(conn)
        .await
}
