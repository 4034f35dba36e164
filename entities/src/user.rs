use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Static bearer token; accounts are provisioned outside this service.
    #[sea_orm(unique)]
    pub api_token: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reading_position::Entity")]
    ReadingPosition,
}

impl Related<super::reading_position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReadingPosition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
