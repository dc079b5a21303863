//! `SeaORM` Entity for marketplace_apps table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "marketplace_apps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub is_core: bool,
    pub is_premium: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::org_marketplace_apps::Entity")]
    OrgMarketplaceApps,
}

impl Related<super::org_marketplace_apps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrgMarketplaceApps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
