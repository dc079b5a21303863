//! Maintenance-mode transactions.
//!
//! Seeding writes across every tenant and inserts rows in whatever order a
//! stage lists them. A maintenance transaction makes that explicit: it
//! bypasses tenant row-level security and defers foreign-key checks until
//! commit, and both settings end with the transaction.
//!
//! # Usage
//!
//! ```ignore
//! use cmis_db::maintenance::MaintenanceExt;
//!
//! let maintenance = db.maintenance().await?;
//! orgs::Entity::insert(org).exec(maintenance.transaction()).await?;
//! maintenance.commit().await?;
//! ```

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, Statement,
    TransactionTrait,
};

/// Statements that switch a fresh transaction into maintenance mode.
#[must_use]
pub const fn activation_statements(backend: DbBackend) -> &'static [&'static str] {
    match backend {
        DbBackend::Postgres => &[
            "SET LOCAL app.is_admin = 'true'",
            "SET CONSTRAINTS ALL DEFERRED",
        ],
        DbBackend::Sqlite => &["PRAGMA defer_foreign_keys = ON"],
        DbBackend::MySql => &[],
    }
}

/// A transaction with tenant isolation bypassed and FK checks deferred.
pub struct MaintenanceTransaction {
    txn: DatabaseTransaction,
}

impl MaintenanceTransaction {
    /// Begins a transaction and activates maintenance mode on it.
    ///
    /// The settings are transaction-scoped (`SET LOCAL`, `defer_foreign_keys`)
    /// and never leak into the pooled connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or a setting is
    /// rejected.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        for statement in activation_statements(db.get_database_backend()) {
            txn.execute_unprepared(statement).await?;
        }
        Ok(Self { txn })
    }

    /// Returns the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Checks deferred constraints without ending the transaction.
    ///
    /// Returns one `"{table} -> {parent}"` entry per dangling reference found
    /// on `SQLite`. On `PostgreSQL` the constraints are made immediate, so a
    /// violation surfaces as the returned error.
    ///
    /// # Errors
    ///
    /// Returns an error if the check itself fails or, on `PostgreSQL`, a
    /// deferred constraint is violated.
    pub async fn deferred_violations(&self) -> Result<Vec<String>, DbErr> {
        match self.txn.get_database_backend() {
            DbBackend::Postgres => {
                self.txn
                    .execute_unprepared("SET CONSTRAINTS ALL IMMEDIATE")
                    .await?;
                Ok(Vec::new())
            }
            DbBackend::Sqlite => {
                let rows = self
                    .txn
                    .query_all(Statement::from_string(
                        DbBackend::Sqlite,
                        "PRAGMA foreign_key_check",
                    ))
                    .await?;
                rows.iter()
                    .map(|row| {
                        let table: String = row.try_get("", "table")?;
                        let parent: String = row.try_get("", "parent")?;
                        Ok(format!("{table} -> {parent}"))
                    })
                    .collect()
            }
            DbBackend::MySql => Ok(Vec::new()),
        }
    }

    /// Commits. Deferred constraints are checked here.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails, including deferred FK failures.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Extension trait for `DatabaseConnection` to open maintenance transactions.
#[async_trait::async_trait]
pub trait MaintenanceExt {
    /// Begins a maintenance transaction.
    ///
    /// # Errors
    ///
    /// See [`MaintenanceTransaction::begin`].
    async fn maintenance(&self) -> Result<MaintenanceTransaction, DbErr>;
}

#[async_trait::async_trait]
impl MaintenanceExt for DatabaseConnection {
    async fn maintenance(&self) -> Result<MaintenanceTransaction, DbErr> {
        MaintenanceTransaction::begin(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_bypasses_rls_and_defers_constraints() {
        let statements = activation_statements(DbBackend::Postgres);
        assert!(statements.contains(&"SET LOCAL app.is_admin = 'true'"));
        assert!(statements.contains(&"SET CONSTRAINTS ALL DEFERRED"));
    }

    #[test]
    fn test_sqlite_defers_foreign_keys() {
        assert_eq!(
            activation_statements(DbBackend::Sqlite),
            &["PRAGMA defer_foreign_keys = ON"]
        );
    }

    #[tokio::test]
    async fn test_sqlite_maintenance_transaction_commits() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let maintenance = db.maintenance().await.unwrap();
        maintenance
            .transaction()
            .execute_unprepared("CREATE TABLE t (id INTEGER PRIMARY KEY)")
            .await
            .unwrap();
        maintenance.commit().await.unwrap();

        db.execute_unprepared("INSERT INTO t (id) VALUES (1)")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_sqlite_reports_dangling_references_before_commit() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        db.execute_unprepared(
            "CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER REFERENCES parent (id));",
        )
        .await
        .unwrap();

        let maintenance = db.maintenance().await.unwrap();
        let txn = maintenance.transaction();
        txn.execute_unprepared("INSERT INTO child (id, parent_id) VALUES (1, 1)")
            .await
            .unwrap();
        assert_eq!(
            maintenance.deferred_violations().await.unwrap(),
            vec!["child -> parent".to_string()]
        );

        maintenance
            .transaction()
            .execute_unprepared("INSERT INTO parent (id) VALUES (1)")
            .await
            .unwrap();
        assert!(maintenance.deferred_violations().await.unwrap().is_empty());
        maintenance.commit().await.unwrap();
    }
}
