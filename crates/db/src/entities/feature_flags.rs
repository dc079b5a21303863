//! `SeaORM` Entity for feature_flags table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "feature_flags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub feature_key: String,
    /// `system`, `organization` or `platform`.
    pub scope_type: String,
    /// Org id for organization scope, platform name for platform scope.
    pub scope_id: Option<String>,
    pub value: bool,
    pub metadata: Json,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::feature_flag_overrides::Entity")]
    FeatureFlagOverrides,
}

impl Related<super::feature_flag_overrides::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeatureFlagOverrides.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
