use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "v_columns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub table_id: i32,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub column_type: String, // see ColumnType
    pub options: String,     // JSON, see ColumnOptions
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vtables::Entity",
        from = "Column::TableId",
        to = "super::vtables::Column::Id",
        on_delete = "Cascade"
    )]
    VTables,
    #[sea_orm(has_many = "super::vcells::Entity")]
    VCells,
}

impl Related<super::vtables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VTables.def()
    }
}

impl Related<super::vcells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VCells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
