use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "v_cells")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub row_id: i32,
    pub column_id: i32,
    pub value: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vrows::Entity",
        from = "Column::RowId",
        to = "super::vrows::Column::Id",
        on_delete = "Cascade"
    )]
    VRows,
    #[sea_orm(
        belongs_to = "super::vcolumns::Entity",
        from = "Column::ColumnId",
        to = "super::vcolumns::Column::Id",
        on_delete = "Cascade"
    )]
    VColumns,
}

impl Related<super::vrows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VRows.def()
    }
}

impl Related<super::vcolumns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VColumns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
