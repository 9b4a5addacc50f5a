//! Typed CRUD over the vtable schema.
//!
//! The repository enforces no cross-entity rules and performs no manual
//! cascades; dependent rows are removed by the schema's `ON DELETE CASCADE`.
//! Every operation runs on whatever connection the repository was built over,
//! so the same calls serve plain reads and transactional orchestrations.

use chrono::Utc;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::collections::BTreeSet;
use tracing::debug;

use super::column_options::{ColumnOptions, ColumnType, VColumn};
use super::entities::{users, vcells, vcolumns, vrows, vtables};
use crate::errors::VTableResult;

#[derive(Debug, Clone, Default)]
pub struct UpdateVTableInput {
    pub name: Option<String>,
    /// `Some(None)` clears the owner
    pub owner_id: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct CreateVColumnInput {
    pub table_id: i32,
    pub name: String,
    pub column_type: ColumnType,
    /// Stored as an empty object when absent
    pub options: Option<ColumnOptions>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVColumnInput {
    pub name: Option<String>,
    pub column_type: Option<ColumnType>,
    pub options: Option<ColumnOptions>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateVCellInput {
    pub row_id: i32,
    pub column_id: i32,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateVCellByPositionInput {
    pub row_id: i32,
    pub column_id: i32,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GetVCellsInput {
    pub row_id: Option<i32>,
    pub column_id: Option<i32>,
    pub table_id: Option<i32>,
}

/// Raw read set for one table, fetched in a fixed number of queries
#[derive(Debug, Clone)]
pub struct VTableFullData {
    pub table: vtables::Model,
    pub columns: Vec<VColumn>,
    pub rows: Vec<vrows::Model>,
    pub cells: Vec<vcells::Model>,
}

pub struct VTableRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C> VTableRepository<'c, C>
where
    C: ConnectionTrait,
{
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    // ================ User methods ================

    pub async fn create_user(&self, id: &str, name: &str) -> Result<users::Model, DbErr> {
        debug!("Creating user {} ({})", name, id);

        users::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(self.conn)
        .await
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.to_string()).one(self.conn).await
    }

    // ================ VTable methods ================

    pub async fn create_table(
        &self,
        name: &str,
        owner_id: Option<String>,
    ) -> Result<vtables::Model, DbErr> {
        debug!("Creating VTable with name: {}", name);

        vtables::ActiveModel {
            name: Set(name.to_string()),
            owner_id: Set(owner_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn update_table(
        &self,
        id: i32,
        input: UpdateVTableInput,
    ) -> Result<Option<vtables::Model>, DbErr> {
        debug!("Updating VTable with id: {}", id);

        let Some(table) = vtables::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        if input.name.is_none() && input.owner_id.is_none() {
            return Ok(Some(table));
        }

        let mut active: vtables::ActiveModel = table.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(owner_id) = input.owner_id {
            active.owner_id = Set(owner_id);
        }

        active.update(self.conn).await.map(Some)
    }

    pub async fn delete_table(&self, id: i32) -> Result<Option<vtables::Model>, DbErr> {
        debug!("Deleting VTable with id: {}", id);

        let Some(table) = vtables::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        // Columns, rows and cells go with it via ON DELETE CASCADE
        vtables::Entity::delete_by_id(id).exec(self.conn).await?;

        Ok(Some(table))
    }

    pub async fn get_table(&self, id: i32) -> Result<Option<vtables::Model>, DbErr> {
        debug!("Getting VTable with id: {}", id);

        vtables::Entity::find_by_id(id).one(self.conn).await
    }

    pub async fn get_tables(&self, owner_id: Option<&str>) -> Result<Vec<vtables::Model>, DbErr> {
        debug!(
            "Getting VTables{}",
            owner_id
                .map(|owner| format!(" for owner: {}", owner))
                .unwrap_or_default()
        );

        let mut query = vtables::Entity::find();
        if let Some(owner_id) = owner_id {
            query = query.filter(vtables::Column::OwnerId.eq(owner_id));
        }

        query.order_by_asc(vtables::Column::Id).all(self.conn).await
    }

    // ================ VColumn methods ================

    pub async fn create_column(&self, input: CreateVColumnInput) -> VTableResult<VColumn> {
        debug!(
            "Creating VColumn with name: {} for table: {}",
            input.name, input.table_id
        );

        let options = match &input.options {
            Some(options) => options.to_stored()?,
            None => "{}".to_string(),
        };

        let model = vcolumns::ActiveModel {
            table_id: Set(input.table_id),
            name: Set(input.name),
            column_type: Set(input.column_type.into()),
            options: Set(options),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        VColumn::try_from(model)
    }

    pub async fn update_column(
        &self,
        id: i32,
        input: UpdateVColumnInput,
    ) -> VTableResult<Option<VColumn>> {
        debug!("Updating VColumn with id: {}", id);

        let Some(column) = vcolumns::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        if input.name.is_none() && input.column_type.is_none() && input.options.is_none() {
            return VColumn::try_from(column).map(Some);
        }

        let mut active: vcolumns::ActiveModel = column.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(column_type) = input.column_type {
            active.column_type = Set(column_type.into());
        }
        if let Some(options) = &input.options {
            active.options = Set(options.to_stored()?);
        }

        let model = active.update(self.conn).await?;
        VColumn::try_from(model).map(Some)
    }

    pub async fn delete_column(&self, id: i32) -> VTableResult<Option<VColumn>> {
        debug!("Deleting VColumn with id: {}", id);

        let Some(column) = vcolumns::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        // Cells of this column go with it via ON DELETE CASCADE
        vcolumns::Entity::delete_by_id(id).exec(self.conn).await?;

        VColumn::try_from(column).map(Some)
    }

    pub async fn get_column(&self, id: i32) -> VTableResult<Option<VColumn>> {
        debug!("Getting VColumn with id: {}", id);

        vcolumns::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(VColumn::try_from)
            .transpose()
    }

    pub async fn get_columns_for_table(&self, table_id: i32) -> VTableResult<Vec<VColumn>> {
        debug!("Getting VColumns for table: {}", table_id);

        vcolumns::Entity::find()
            .filter(vcolumns::Column::TableId.eq(table_id))
            .order_by_asc(vcolumns::Column::Id)
            .all(self.conn)
            .await?
            .into_iter()
            .map(VColumn::try_from)
            .collect()
    }

    // ================ VRow methods ================

    pub async fn create_row(&self, table_id: i32) -> Result<vrows::Model, DbErr> {
        debug!("Creating VRow for table: {}", table_id);

        vrows::ActiveModel {
            table_id: Set(table_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn delete_row(&self, id: i32) -> Result<Option<vrows::Model>, DbErr> {
        debug!("Deleting VRow with id: {}", id);

        let Some(row) = vrows::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        // Cells of this row go with it via ON DELETE CASCADE
        vrows::Entity::delete_by_id(id).exec(self.conn).await?;

        Ok(Some(row))
    }

    pub async fn get_row(&self, id: i32) -> Result<Option<vrows::Model>, DbErr> {
        debug!("Getting VRow with id: {}", id);

        vrows::Entity::find_by_id(id).one(self.conn).await
    }

    pub async fn get_rows_for_table(&self, table_id: i32) -> Result<Vec<vrows::Model>, DbErr> {
        debug!("Getting VRows for table: {}", table_id);

        vrows::Entity::find()
            .filter(vrows::Column::TableId.eq(table_id))
            .order_by_asc(vrows::Column::Id)
            .all(self.conn)
            .await
    }

    // ================ VCell methods ================

    pub async fn create_cell(&self, input: CreateVCellInput) -> Result<vcells::Model, DbErr> {
        debug!(
            "Creating VCell for row: {}, column: {}",
            input.row_id, input.column_id
        );

        vcells::ActiveModel {
            row_id: Set(input.row_id),
            column_id: Set(input.column_id),
            value: Set(input.value),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    /// Insert all cells with one statement. Returns the stored cells in
    /// insertion order.
    pub async fn bulk_create_cells(
        &self,
        inputs: Vec<CreateVCellInput>,
    ) -> Result<Vec<vcells::Model>, DbErr> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Bulk creating {} VCells", inputs.len());

        let models = inputs.iter().map(|input| vcells::ActiveModel {
            row_id: Set(input.row_id),
            column_id: Set(input.column_id),
            value: Set(input.value.clone()),
            ..Default::default()
        });
        vcells::Entity::insert_many(models).exec(self.conn).await?;

        // Positions are unique, so reading them back yields exactly the new cells
        let row_ids: BTreeSet<i32> = inputs.iter().map(|input| input.row_id).collect();
        let column_ids: BTreeSet<i32> = inputs.iter().map(|input| input.column_id).collect();
        let wanted: BTreeSet<(i32, i32)> = inputs
            .iter()
            .map(|input| (input.row_id, input.column_id))
            .collect();

        let cells = vcells::Entity::find()
            .filter(vcells::Column::RowId.is_in(row_ids))
            .filter(vcells::Column::ColumnId.is_in(column_ids))
            .order_by_asc(vcells::Column::Id)
            .all(self.conn)
            .await?;

        Ok(cells
            .into_iter()
            .filter(|cell| wanted.contains(&(cell.row_id, cell.column_id)))
            .collect())
    }

    pub async fn update_cell(
        &self,
        id: i32,
        value: Option<String>,
    ) -> Result<Option<vcells::Model>, DbErr> {
        debug!("Updating VCell with id: {}", id);

        let Some(cell) = vcells::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        let mut active: vcells::ActiveModel = cell.into();
        active.value = Set(value);
        active.update(self.conn).await.map(Some)
    }

    /// Overwrite the value of the cell at `(row_id, column_id)`. Never inserts.
    pub async fn update_cell_by_position(
        &self,
        input: UpdateVCellByPositionInput,
    ) -> Result<Option<vcells::Model>, DbErr> {
        debug!(
            "Updating VCell at row_id: {}, column_id: {}",
            input.row_id, input.column_id
        );

        let Some(cell) = vcells::Entity::find()
            .filter(vcells::Column::RowId.eq(input.row_id))
            .filter(vcells::Column::ColumnId.eq(input.column_id))
            .one(self.conn)
            .await?
        else {
            return Ok(None);
        };

        let mut active: vcells::ActiveModel = cell.into();
        active.value = Set(input.value);
        active.update(self.conn).await.map(Some)
    }

    pub async fn delete_cell(&self, id: i32) -> Result<Option<vcells::Model>, DbErr> {
        debug!("Deleting VCell with id: {}", id);

        let Some(cell) = vcells::Entity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        vcells::Entity::delete_by_id(id).exec(self.conn).await?;

        Ok(Some(cell))
    }

    pub async fn get_cell(&self, id: i32) -> Result<Option<vcells::Model>, DbErr> {
        debug!("Getting VCell with id: {}", id);

        vcells::Entity::find_by_id(id).one(self.conn).await
    }

    pub async fn get_cells(&self, input: GetVCellsInput) -> Result<Vec<vcells::Model>, DbErr> {
        debug!(
            "Getting VCells (row: {:?}, column: {:?}, table: {:?})",
            input.row_id, input.column_id, input.table_id
        );

        let mut query = vcells::Entity::find();

        if let Some(row_id) = input.row_id {
            query = query.filter(vcells::Column::RowId.eq(row_id));
        }

        if let Some(column_id) = input.column_id {
            query = query.filter(vcells::Column::ColumnId.eq(column_id));
        }

        if let Some(table_id) = input.table_id {
            // Cells only know their table through their row
            query = query
                .join(JoinType::InnerJoin, vcells::Relation::VRows.def())
                .filter(vrows::Column::TableId.eq(table_id));
        }

        query.order_by_asc(vcells::Column::Id).all(self.conn).await
    }

    pub async fn get_cells_for_row(&self, row_id: i32) -> Result<Vec<vcells::Model>, DbErr> {
        self.get_cells(GetVCellsInput {
            row_id: Some(row_id),
            ..Default::default()
        })
        .await
    }

    pub async fn get_cells_for_column(&self, column_id: i32) -> Result<Vec<vcells::Model>, DbErr> {
        self.get_cells(GetVCellsInput {
            column_id: Some(column_id),
            ..Default::default()
        })
        .await
    }

    pub async fn get_cells_for_table(&self, table_id: i32) -> Result<Vec<vcells::Model>, DbErr> {
        self.get_cells(GetVCellsInput {
            table_id: Some(table_id),
            ..Default::default()
        })
        .await
    }

    /// Everything needed to assemble a table view: four queries regardless of
    /// the table's size.
    pub async fn get_full_table(&self, id: i32) -> VTableResult<Option<VTableFullData>> {
        debug!("Getting full VTable with id: {}", id);

        let Some(table) = self.get_table(id).await? else {
            return Ok(None);
        };

        let columns = self.get_columns_for_table(id).await?;
        let rows = self.get_rows_for_table(id).await?;
        let cells = self.get_cells_for_table(id).await?;

        Ok(Some(VTableFullData {
            table,
            columns,
            rows,
            cells,
        }))
    }
}

impl<'c, C> VTableRepository<'c, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    /// Apply every position update inside one transaction and report how many
    /// cells actually changed. Positions without a cell are skipped.
    pub async fn bulk_update_cells_by_position(
        &self,
        inputs: &[UpdateVCellByPositionInput],
    ) -> Result<u64, DbErr> {
        if inputs.is_empty() {
            return Ok(0);
        }

        debug!("Bulk updating {} VCells", inputs.len());

        let txn = self.conn.begin().await?;
        let mut updated_count = 0;

        for input in inputs {
            let result = vcells::Entity::update_many()
                .col_expr(vcells::Column::Value, Expr::value(input.value.clone()))
                .filter(
                    Condition::all()
                        .add(vcells::Column::RowId.eq(input.row_id))
                        .add(vcells::Column::ColumnId.eq(input.column_id)),
                )
                .exec(&txn)
                .await?;

            updated_count += result.rows_affected;
        }

        txn.commit().await?;

        Ok(updated_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_reads_return_none_when_absent() {
        let db = setup_test_db().await;
        let repo = VTableRepository::new(&db);

        assert!(repo.get_table(42).await.unwrap().is_none());
        assert!(repo.get_column(42).await.unwrap().is_none());
        assert!(repo.get_row(42).await.unwrap().is_none());
        assert!(repo.get_cell(42).await.unwrap().is_none());
        assert!(repo.get_full_table(42).await.unwrap().is_none());
        assert!(repo.get_columns_for_table(42).await.unwrap().is_empty());
        assert!(repo.delete_table(42).await.unwrap().is_none());
        assert!(repo.update_table(42, UpdateVTableInput::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_column_defaults_options_to_empty_object() {
        let db = setup_test_db().await;
        let repo = VTableRepository::new(&db);

        let table = repo.create_table("Plain", None).await.unwrap();
        let column = repo
            .create_column(CreateVColumnInput {
                table_id: table.id,
                name: "Notes".to_string(),
                column_type: ColumnType::Text,
                options: None,
            })
            .await
            .unwrap();

        let stored = vcolumns::Entity::find_by_id(column.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.options, "{}");
        assert_eq!(stored.column_type, "text");
        assert_eq!(column.options, ColumnOptions::Text {});
    }

    #[tokio::test]
    async fn test_bulk_create_cells_empty_input() {
        let db = setup_test_db().await;
        let repo = VTableRepository::new(&db);

        assert!(repo.bulk_create_cells(Vec::new()).await.unwrap().is_empty());
        assert_eq!(repo.bulk_update_cells_by_position(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_cell_by_position_never_inserts() {
        let db = setup_test_db().await;
        let repo = VTableRepository::new(&db);

        let table = repo.create_table("Sparse", None).await.unwrap();
        let row = repo.create_row(table.id).await.unwrap();
        let column = repo
            .create_column(CreateVColumnInput {
                table_id: table.id,
                name: "Title".to_string(),
                column_type: ColumnType::Text,
                options: None,
            })
            .await
            .unwrap();

        let missing = repo
            .update_cell_by_position(UpdateVCellByPositionInput {
                row_id: row.id,
                column_id: column.id,
                value: Some("x".to_string()),
            })
            .await
            .unwrap();
        assert!(missing.is_none());
        assert!(repo.get_cells_for_row(row.id).await.unwrap().is_empty());

        repo.create_cell(CreateVCellInput {
            row_id: row.id,
            column_id: column.id,
            value: None,
        })
        .await
        .unwrap();

        let updated = repo
            .update_cell_by_position(UpdateVCellByPositionInput {
                row_id: row.id,
                column_id: column.id,
                value: Some("x".to_string()),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.value.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_duplicate_position_is_rejected_by_storage() {
        let db = setup_test_db().await;
        let repo = VTableRepository::new(&db);

        let table = repo.create_table("Unique", None).await.unwrap();
        let row = repo.create_row(table.id).await.unwrap();
        let column = repo
            .create_column(CreateVColumnInput {
                table_id: table.id,
                name: "Title".to_string(),
                column_type: ColumnType::Text,
                options: None,
            })
            .await
            .unwrap();

        let input = CreateVCellInput {
            row_id: row.id,
            column_id: column.id,
            value: None,
        };
        repo.create_cell(input.clone()).await.unwrap();
        assert!(repo.create_cell(input).await.is_err());
    }
}
