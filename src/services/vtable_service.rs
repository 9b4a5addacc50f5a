use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info};

use super::vtable_types::*;
use crate::database::entities::{vcells, vtables};
use crate::database::{
    ColumnOptions, CreateVColumnInput, UpdateVCellByPositionInput, UpdateVColumnInput,
    UpdateVTableInput, VTableRepository,
};
use crate::errors::{VTableError, VTableResult};

/// The only component that combines tables, columns, rows and cells into one
/// view, and the only one that runs multi-step writes.
#[derive(Clone)]
pub struct VTableService {
    db: DatabaseConnection,
}

impl VTableService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn repository(&self) -> VTableRepository<'_, DatabaseConnection> {
        VTableRepository::new(&self.db)
    }

    /// Create a table with the default columns and one row of default cells.
    /// Nothing persists unless every step succeeds.
    pub async fn create_table(
        &self,
        input: CreateVTableServiceInput,
    ) -> VTableResult<AssembledVTable> {
        debug!("Creating VTable with name: {}", input.name);

        let txn = self.db.begin().await?;
        let table_id = {
            let repo = VTableRepository::new(&txn);

            let table = repo.create_table(&input.name, input.owner_id).await?;

            let mut columns = Vec::with_capacity(DEFAULT_COLUMNS.len());
            for definition in DEFAULT_COLUMNS.iter() {
                columns.push(repo.create_column(definition.to_input(table.id)).await?);
            }

            let row = repo.create_row(table.id).await?;
            repo.bulk_create_cells(default_cells_for_row(row.id, &columns))
                .await?;

            table.id
        };
        txn.commit().await?;

        info!("Created VTable {} ({})", table_id, input.name);

        // Re-read so the result has exactly the shape every other read returns
        self.get_table(table_id)
            .await?
            .ok_or(VTableError::TableNotFound(table_id))
    }

    pub async fn get_table(&self, id: i32) -> VTableResult<Option<AssembledVTable>> {
        debug!("Getting assembled VTable with id: {}", id);

        Ok(self
            .repository()
            .get_full_table(id)
            .await?
            .map(AssembledVTable::assemble))
    }

    pub async fn get_tables(&self, owner_id: Option<&str>) -> VTableResult<Vec<vtables::Model>> {
        Ok(self.repository().get_tables(owner_id).await?)
    }

    pub async fn update_table(
        &self,
        input: UpdateVTableServiceInput,
    ) -> VTableResult<Option<vtables::Model>> {
        debug!("Updating VTable with id: {}", input.id);

        Ok(self
            .repository()
            .update_table(
                input.id,
                UpdateVTableInput {
                    name: input.name,
                    owner_id: input.owner_id,
                },
            )
            .await?)
    }

    pub async fn delete_table(&self, id: i32) -> VTableResult<Option<vtables::Model>> {
        debug!("Deleting VTable with id: {}", id);

        let deleted = self.repository().delete_table(id).await?;
        if deleted.is_some() {
            info!("Deleted VTable {}", id);
        }
        Ok(deleted)
    }

    /// Append a column. Existing rows get no cell for it.
    pub async fn add_column(
        &self,
        input: AddVTableColumnServiceInput,
    ) -> VTableResult<Option<AssembledVTable>> {
        debug!("Adding column {} to table: {}", input.name, input.table_id);

        let repo = self.repository();
        if repo.get_table(input.table_id).await?.is_none() {
            return Ok(None);
        }

        let options = input
            .options
            .map(|value| ColumnOptions::from_input(input.column_type, value))
            .transpose()?;

        repo.create_column(CreateVColumnInput {
            table_id: input.table_id,
            name: input.name,
            column_type: input.column_type,
            options,
        })
        .await?;

        self.get_table(input.table_id).await
    }

    /// Update a column and return its table's fresh view.
    ///
    /// Stored cell values are left untouched when the type changes. Options
    /// of the old type cannot describe the new one, so a type change without
    /// new options resets them to empty.
    pub async fn update_column(
        &self,
        input: UpdateVTableColumnServiceInput,
    ) -> VTableResult<Option<AssembledVTable>> {
        debug!("Updating VColumn with id: {}", input.id);

        let repo = self.repository();
        let Some(column) = repo.get_column(input.id).await? else {
            return Ok(None);
        };

        let column_type = input.column_type.unwrap_or(column.column_type);
        let options = match input.options {
            Some(value) => Some(ColumnOptions::from_input(column_type, value)?),
            None if column_type != column.column_type => Some(ColumnOptions::empty(column_type)),
            None => None,
        };

        let Some(updated) = repo
            .update_column(
                input.id,
                UpdateVColumnInput {
                    name: input.name,
                    column_type: input.column_type,
                    options,
                },
            )
            .await?
        else {
            return Ok(None);
        };

        self.get_table(updated.table_id).await
    }

    pub async fn delete_column(&self, id: i32) -> VTableResult<Option<AssembledVTable>> {
        debug!("Deleting VColumn with id: {}", id);

        let repo = self.repository();
        let Some(column) = repo.get_column(id).await? else {
            return Ok(None);
        };

        repo.delete_column(id).await?;

        self.get_table(column.table_id).await
    }

    /// Append a row holding one default cell per existing column
    pub async fn add_row(&self, table_id: i32) -> VTableResult<Option<AssembledVTable>> {
        debug!("Adding row to table: {}", table_id);

        let txn = self.db.begin().await?;
        {
            let repo = VTableRepository::new(&txn);

            let Some(table) = repo.get_table(table_id).await? else {
                return Ok(None);
            };

            let columns = repo.get_columns_for_table(table.id).await?;
            let row = repo.create_row(table.id).await?;
            repo.bulk_create_cells(default_cells_for_row(row.id, &columns))
                .await?;
        }
        txn.commit().await?;

        self.get_table(table_id).await
    }

    pub async fn delete_row(&self, id: i32) -> VTableResult<Option<AssembledVTable>> {
        debug!("Deleting VRow with id: {}", id);

        let repo = self.repository();
        let Some(row) = repo.get_row(id).await? else {
            return Ok(None);
        };

        repo.delete_row(id).await?;

        self.get_table(row.table_id).await
    }

    /// Update one cell, addressed either by its id or by its (row, column)
    /// position. An id takes precedence over a position. Position updates
    /// never create a cell.
    pub async fn update_cell(
        &self,
        input: UpdateVTableCellServiceInput,
    ) -> VTableResult<Option<vcells::Model>> {
        debug!("Updating VCell");

        let repo = self.repository();
        match (input.id, input.row_id, input.column_id) {
            (Some(id), _, _) => Ok(repo.update_cell(id, input.value).await?),
            (None, Some(row_id), Some(column_id)) => Ok(repo
                .update_cell_by_position(UpdateVCellByPositionInput {
                    row_id,
                    column_id,
                    value: input.value,
                })
                .await?),
            _ => Err(VTableError::InvalidInput(
                "Either cell id or both row_id and column_id must be provided".to_string(),
            )),
        }
    }

    /// Update existing cells by position in one transaction. Positions with
    /// no cell are skipped, never created.
    pub async fn bulk_update_cells(
        &self,
        input: BulkUpdateCellsInput,
    ) -> VTableResult<BulkUpdateCellsResult> {
        if input.cells.is_empty() {
            return Ok(BulkUpdateCellsResult { updated_count: 0 });
        }

        debug!("Bulk updating {} cells", input.cells.len());

        let updates: Vec<UpdateVCellByPositionInput> = input
            .cells
            .into_iter()
            .map(|cell| UpdateVCellByPositionInput {
                row_id: cell.row_id,
                column_id: cell.column_id,
                value: cell.value,
            })
            .collect();

        let updated_count = self
            .repository()
            .bulk_update_cells_by_position(&updates)
            .await?;

        Ok(BulkUpdateCellsResult { updated_count })
    }
}
