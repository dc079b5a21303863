//! `SeaORM` Entity for channels table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "channels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub kind: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::channel_formats::Entity")]
    ChannelFormats,
}

impl Related<super::channel_formats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChannelFormats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
