//! Tenant-scoped transactions.
//!
//! Tenant tables carry row-level security on `PostgreSQL` (see the
//! `tenant_rls` migration): a row is visible only when `app.current_org_id`
//! names its organization. Request handlers reading tenant rows run inside a
//! [`TenantTransaction`] so the policy sees the caller's organization.
//!
//! # Usage
//!
//! ```ignore
//! use cmis_db::tenant::TenantExt;
//!
//! let tenant = db.with_tenant(org_id).await?;
//! let org = orgs::Entity::find_by_id(org_id).one(tenant.transaction()).await?;
//! tenant.commit().await?;
//! ```

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, TransactionTrait,
};
use uuid::Uuid;

/// Statement that scopes a fresh transaction to `org_id`, if the backend
/// enforces tenant isolation.
#[must_use]
pub fn context_statement(backend: DbBackend, org_id: Uuid) -> Option<String> {
    match backend {
        DbBackend::Postgres => Some(format!("SET LOCAL app.current_org_id = '{org_id}'")),
        DbBackend::Sqlite | DbBackend::MySql => None,
    }
}

/// A transaction that only sees the rows of one organization.
pub struct TenantTransaction {
    txn: DatabaseTransaction,
}

impl TenantTransaction {
    /// Begins a transaction scoped to `org_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the context
    /// cannot be set.
    pub async fn begin(db: &DatabaseConnection, org_id: Uuid) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        if let Some(sql) = context_statement(db.get_database_backend(), org_id) {
            txn.execute_unprepared(&sql).await?;
        }
        Ok(Self { txn })
    }

    /// Returns the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }
}

/// Extension trait for opening tenant transactions on a pool.
#[async_trait::async_trait]
pub trait TenantExt {
    /// Begins a transaction scoped to `org_id`.
    ///
    /// # Errors
    ///
    /// See [`TenantTransaction::begin`].
    async fn with_tenant(&self, org_id: Uuid) -> Result<TenantTransaction, DbErr>;
}

#[async_trait::async_trait]
impl TenantExt for DatabaseConnection {
    async fn with_tenant(&self, org_id: Uuid) -> Result<TenantTransaction, DbErr> {
        TenantTransaction::begin(self, org_id).await
    }
}
