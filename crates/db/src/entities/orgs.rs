//! `SeaORM` Entity for orgs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "orgs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub locale: String,
    pub currency: String,
    pub timezone: String,
    pub industry: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_orgs::Entity")]
    UserOrgs,
    #[sea_orm(has_many = "super::platform_connections::Entity")]
    PlatformConnections,
    #[sea_orm(has_many = "super::campaigns::Entity")]
    Campaigns,
}

impl Related<super::user_orgs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserOrgs.def()
    }
}

impl Related<super::platform_connections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformConnections.def()
    }
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaigns.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_orgs::Relation::Users.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_orgs::Relation::Orgs.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
