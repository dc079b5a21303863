//! Organizations, users, roles, permissions and who holds what.
//!
//! All of these are upserts keyed by registry ids, so ids and creation
//! timestamps survive every re-run.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, Set};

use cmis_core::auth::is_password_hash;
use cmis_core::catalog::{PERMISSIONS, grants_for};
use cmis_core::identity::{IdentityRegistry, MEMBERSHIPS, ORGANIZATIONS, ROLES, USERS};
use cmis_core::seeding::{EntityKind, SeedError, StepManifest, StepSummary};

use crate::entities::{orgs, permissions, role_permissions, roles, user_orgs, users};
use crate::seeding::context::SeedContext;
use crate::seeding::step::{SeedStep, db_error};
use crate::upsert::{key_eq, upsert_by, upsert_by_with};

/// Id of a seeded permission.
#[must_use]
pub fn permission_id(code: &str) -> uuid::Uuid {
    IdentityRegistry::derive("permission", code)
}

/// Tenant organizations.
pub struct OrganizationsStep;

#[async_trait]
impl SeedStep for OrganizationsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("organizations", &[EntityKind::Organization])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut summary = StepSummary::default();

        for org in ORGANIZATIONS {
            let id = ctx.org(step, org.name)?;
            let row = orgs::ActiveModel {
                id: Set(id),
                name: Set(org.name.to_string()),
                locale: Set(org.locale.to_string()),
                currency: Set(org.currency.to_string()),
                timezone: Set(org.timezone.to_string()),
                industry: Set(Some(org.industry.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
            };
            summary += upsert_by(txn, key_eq(orgs::Column::Id, id), row, &[orgs::Column::CreatedAt])
                .await
                .map_err(|e| db_error(step, e))?
                .into();
        }

        Ok(summary)
    }
}

/// Demo user accounts.
///
/// New users get the run's demo password hash. A user whose stored hash is
/// already a valid PHC string keeps it, so changed passwords survive reseeds.
pub struct UsersStep;

#[async_trait]
impl SeedStep for UsersStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("users", &[EntityKind::User])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut summary = StepSummary::default();

        for user in USERS {
            let id = ctx.user(step, user.email)?;
            let row = users::ActiveModel {
                id: Set(id),
                email: Set(user.email.to_string()),
                name: Set(user.name.to_string()),
                password_hash: Set(ctx.password_hash().to_string()),
                locale: Set(user.locale.to_string()),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let outcome = upsert_by_with(txn, key_eq(users::Column::Id, id), row, |existing, row| {
                row.created_at = Set(existing.created_at);
                if is_password_hash(&existing.password_hash) {
                    row.password_hash = ActiveValue::Unchanged(existing.password_hash.clone());
                }
            })
            .await
            .map_err(|e| db_error(step, e))?;
            summary += outcome.into();
        }

        Ok(summary)
    }
}

/// System roles.
pub struct RolesStep;

#[async_trait]
impl SeedStep for RolesStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("roles", &[EntityKind::Role])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut summary = StepSummary::default();

        for role in ROLES {
            let id = ctx.role(step, role.code)?;
            let row = roles::ActiveModel {
                id: Set(id),
                code: Set(role.code.to_string()),
                name: Set(role.name.to_string()),
                description: Set(role.description.to_string()),
                is_system: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            };
            summary += upsert_by(txn, key_eq(roles::Column::Id, id), row, &[roles::Column::CreatedAt])
                .await
                .map_err(|e| db_error(step, e))?
                .into();
        }

        Ok(summary)
    }
}

/// Permission catalog.
pub struct PermissionsStep;

#[async_trait]
impl SeedStep for PermissionsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("permissions", &[EntityKind::Permission])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut summary = StepSummary::default();

        for perm in PERMISSIONS {
            let id = permission_id(perm.code);
            let row = permissions::ActiveModel {
                id: Set(id),
                code: Set(perm.code.to_string()),
                name: Set(perm.name.to_string()),
                category: Set(perm.category.to_string()),
                description: Set(perm.description.to_string()),
                is_dangerous: Set(perm.is_dangerous),
                created_at: Set(now),
                updated_at: Set(now),
            };
            summary += upsert_by(
                txn,
                key_eq(permissions::Column::Id, id),
                row,
                &[permissions::Column::CreatedAt],
            )
            .await
            .map_err(|e| db_error(step, e))?
            .into();
        }

        Ok(summary)
    }
}

/// Role to permission grants. Existing grants are left alone.
pub struct RolePermissionsStep;

#[async_trait]
impl SeedStep for RolePermissionsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("role_permissions", &[EntityKind::RolePermission])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut rows = Vec::new();

        for role in ROLES {
            let role_id = ctx.role(step, role.code)?;
            rows.extend(grants_for(role.code).into_iter().map(|perm| {
                role_permissions::ActiveModel {
                    role_id: Set(role_id),
                    permission_id: Set(permission_id(perm.code)),
                    created_at: Set(now),
                }
            }));
        }

        if rows.is_empty() {
            return Ok(StepSummary::default());
        }

        let inserted = role_permissions::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    role_permissions::Column::RoleId,
                    role_permissions::Column::PermissionId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(txn)
            .await
            .map_err(|e| db_error(step, e))?;

        Ok(StepSummary::inserted(inserted))
    }
}

/// Organization memberships with their role.
pub struct MembershipsStep;

#[async_trait]
impl SeedStep for MembershipsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("memberships", &[EntityKind::Membership])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();
        let mut summary = StepSummary::default();

        for (email, org, role) in MEMBERSHIPS {
            let user_id = ctx.user(step, email)?;
            let org_id = ctx.org(step, org)?;
            let role_id = ctx.role(step, role)?;
            let row = user_orgs::ActiveModel {
                user_id: Set(user_id),
                org_id: Set(org_id),
                role_id: Set(role_id),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let key = key_eq(user_orgs::Column::UserId, user_id)
                .add(user_orgs::Column::OrgId.eq(org_id));
            summary += upsert_by(txn, key, row, &[user_orgs::Column::CreatedAt])
                .await
                .map_err(|e| db_error(step, e))?
                .into();
        }

        Ok(summary)
    }
}
