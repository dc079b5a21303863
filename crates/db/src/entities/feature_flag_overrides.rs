//! `SeaORM` Entity for feature_flag_overrides table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "feature_flag_overrides")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub feature_flag_id: Uuid,
    /// `user` or `organization`.
    pub target_type: String,
    pub target_id: Uuid,
    pub value: bool,
    pub reason: Option<String>,
    pub expires_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::feature_flags::Entity",
        from = "Column::FeatureFlagId",
        to = "super::feature_flags::Column::Id",
        on_delete = "Cascade"
    )]
    FeatureFlags,
}

impl Related<super::feature_flags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeatureFlags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
