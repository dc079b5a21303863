//! Natural-key upserts for seeders that may run more than once.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
};

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row matched the natural key; one was inserted.
    Inserted,
    /// The matching row was updated in place.
    Updated,
}

type ModelOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Model;
type ColumnOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Column;

/// Inserts `active`, or updates the row matching `natural_key` with it.
///
/// On update, the `preserved` columns keep their stored values: pass the
/// surrogate id and creation timestamp so re-runs never change them.
///
/// # Errors
///
/// Returns an error if the lookup or the write fails.
pub async fn upsert_by<A, C>(
    conn: &C,
    natural_key: Condition,
    active: A,
    preserved: &[ColumnOf<A>],
) -> Result<UpsertOutcome, DbErr>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    ModelOf<A>: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    upsert_by_with(conn, natural_key, active, |existing, active| {
        for column in preserved {
            active.set(*column, existing.get(*column));
        }
    })
    .await
}

/// Like [`upsert_by`], with a caller-supplied merge of the stored row into
/// the new values.
///
/// # Errors
///
/// Returns an error if the lookup or the write fails.
pub async fn upsert_by_with<A, C, F>(
    conn: &C,
    natural_key: Condition,
    mut active: A,
    merge: F,
) -> Result<UpsertOutcome, DbErr>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    ModelOf<A>: IntoActiveModel<A>,
    C: ConnectionTrait,
    F: FnOnce(&ModelOf<A>, &mut A),
{
    let existing = A::Entity::find().filter(natural_key).one(conn).await?;

    match existing {
        Some(existing) => {
            merge(&existing, &mut active);
            active.update(conn).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            active.insert(conn).await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Shorthand for a single-column natural key.
pub fn key_eq<C, V>(column: C, value: V) -> Condition
where
    C: ColumnTrait,
    V: Into<sea_orm::Value>,
{
    Condition::all().add(column.eq(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::marketplace_apps;
    use crate::migration::{Migrator, MigratorTrait};
    use chrono::{Duration, Utc};
    use sea_orm::{Database, PaginatorTrait, Set};
    use uuid::Uuid;

    fn app(id: Uuid, name: &str, at: chrono::DateTime<Utc>) -> marketplace_apps::ActiveModel {
        marketplace_apps::ActiveModel {
            id: Set(id),
            slug: Set("campaigns".into()),
            name: Set(name.into()),
            category: Set("marketing".into()),
            description: Set(String::new()),
            is_core: Set(true),
            is_premium: Set(false),
            created_at: Set(at.into()),
            updated_at: Set(at.into()),
        }
    }

    #[tokio::test]
    async fn test_second_upsert_updates_and_preserves_identity() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let first_id = Uuid::now_v7();
        let first_at = Utc::now() - Duration::days(1);
        let key = || key_eq(marketplace_apps::Column::Slug, "campaigns");
        let preserved = [
            marketplace_apps::Column::Id,
            marketplace_apps::Column::CreatedAt,
        ];

        let outcome = upsert_by(&db, key(), app(first_id, "Campaigns", first_at), &preserved)
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);

        let outcome = upsert_by(
            &db,
            key(),
            app(Uuid::now_v7(), "Campaign Manager", Utc::now()),
            &preserved,
        )
        .await
        .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        assert_eq!(marketplace_apps::Entity::find().count(&db).await.unwrap(), 1);
        let row = marketplace_apps::Entity::find()
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.id, first_id);
        assert_eq!(row.name, "Campaign Manager");
        assert!(row.updated_at > row.created_at);
    }
}
