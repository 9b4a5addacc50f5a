use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "v_tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub owner_id: Option<String>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::vcolumns::Entity")]
    VColumns,
    #[sea_orm(has_many = "super::vrows::Entity")]
    VRows,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::vcolumns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VColumns.def()
    }
}

impl Related<super::vrows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
