//! `SeaORM` Entity for users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub locale: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_orgs::Entity")]
    UserOrgs,
}

impl Related<super::user_orgs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserOrgs.def()
    }
}

impl Related<super::orgs::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_orgs::Relation::Orgs.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_orgs::Relation::Users.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
