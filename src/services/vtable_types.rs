use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::database::entities::{vrows, vtables};
use crate::database::{
    ColumnOptions, ColumnType, CreateVCellInput, CreateVColumnInput, VColumn, VTableFullData,
};

/// Columns every new table starts with, in display order
pub const DEFAULT_COLUMNS: [DefaultColumnDefinition; 4] = [
    DefaultColumnDefinition {
        name: "Title",
        column_type: ColumnType::Text,
        choices: &[],
        default: None,
    },
    DefaultColumnDefinition {
        name: "Status",
        column_type: ColumnType::Select,
        choices: &["To Do", "In Progress", "Done"],
        default: Some("To Do"),
    },
    DefaultColumnDefinition {
        name: "Date",
        column_type: ColumnType::Date,
        choices: &[],
        default: None,
    },
    DefaultColumnDefinition {
        name: "Priority",
        column_type: ColumnType::Select,
        choices: &["Low", "Medium", "High"],
        default: Some("Medium"),
    },
];

#[derive(Debug, Clone, Copy)]
pub struct DefaultColumnDefinition {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub choices: &'static [&'static str],
    pub default: Option<&'static str>,
}

impl DefaultColumnDefinition {
    pub fn options(&self) -> Option<ColumnOptions> {
        match self.column_type {
            ColumnType::Select => Some(ColumnOptions::select(self.choices, self.default)),
            _ => None,
        }
    }

    pub fn to_input(&self, table_id: i32) -> CreateVColumnInput {
        CreateVColumnInput {
            table_id,
            name: self.name.to_string(),
            column_type: self.column_type,
            options: self.options(),
        }
    }
}

/// One cell per column for a new row, each holding its column's default
pub fn default_cells_for_row(row_id: i32, columns: &[VColumn]) -> Vec<CreateVCellInput> {
    columns
        .iter()
        .map(|column| CreateVCellInput {
            row_id,
            column_id: column.id,
            value: column.default_value(),
        })
        .collect()
}

/// Lookup key of the cell at a row/column intersection
pub fn cell_key(row_id: i32, column_id: i32) -> String {
    format!("{}-{}", row_id, column_id)
}

/// Cell payload inside an assembled view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellValue {
    pub id: i32,
    pub value: Option<String>,
}

/// Read-optimised view of one table. Cells are keyed by [`cell_key`]; a
/// missing key means no cell is recorded for that position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledVTable {
    pub table: vtables::Model,
    pub columns: Vec<VColumn>,
    pub rows: Vec<vrows::Model>,
    pub cells: IndexMap<String, CellValue>,
}

impl AssembledVTable {
    pub fn assemble(data: VTableFullData) -> Self {
        let VTableFullData {
            table,
            columns,
            rows,
            cells,
        } = data;

        let row_ids: HashSet<i32> = rows.iter().map(|row| row.id).collect();
        let column_ids: HashSet<i32> = columns.iter().map(|column| column.id).collect();

        let cells = cells
            .into_iter()
            .filter(|cell| row_ids.contains(&cell.row_id) && column_ids.contains(&cell.column_id))
            .map(|cell| {
                (
                    cell_key(cell.row_id, cell.column_id),
                    CellValue {
                        id: cell.id,
                        value: cell.value,
                    },
                )
            })
            .collect();

        Self {
            table,
            columns,
            rows,
            cells,
        }
    }

    pub fn cell(&self, row_id: i32, column_id: i32) -> Option<&CellValue> {
        self.cells.get(&cell_key(row_id, column_id))
    }

    /// Value at a position, `None` for both an empty cell and a missing one
    pub fn value(&self, row_id: i32, column_id: i32) -> Option<&str> {
        self.cell(row_id, column_id)
            .and_then(|cell| cell.value.as_deref())
    }

    pub fn column_named(&self, name: &str) -> Option<&VColumn> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVTableServiceInput {
    pub name: String,
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVTableServiceInput {
    pub id: i32,
    pub name: Option<String>,
    /// `Some(None)` clears the owner
    pub owner_id: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct AddVTableColumnServiceInput {
    pub table_id: i32,
    pub name: String,
    pub column_type: ColumnType,
    pub options: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVTableColumnServiceInput {
    pub id: i32,
    pub name: Option<String>,
    pub column_type: Option<ColumnType>,
    pub options: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVTableCellServiceInput {
    pub id: Option<i32>,
    pub row_id: Option<i32>,
    pub column_id: Option<i32>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct CellPositionUpdate {
    pub row_id: i32,
    pub column_id: i32,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct BulkUpdateCellsInput {
    pub cells: Vec<CellPositionUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct BulkUpdateCellsResult {
    pub updated_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn column(id: i32, options: ColumnOptions) -> VColumn {
        VColumn {
            id,
            table_id: 1,
            name: format!("c{}", id),
            column_type: options.column_type(),
            options,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_columns_shape() {
        let names: Vec<&str> = DEFAULT_COLUMNS.iter().map(|c| c.name).collect();
        assert_eq!(names, ["Title", "Status", "Date", "Priority"]);

        assert_eq!(DEFAULT_COLUMNS[0].options(), None);
        assert_eq!(
            DEFAULT_COLUMNS[1].options().and_then(|o| o.default_value()),
            Some("To Do".to_string())
        );
        assert_eq!(
            DEFAULT_COLUMNS[3].options().and_then(|o| o.default_value()),
            Some("Medium".to_string())
        );
    }

    #[test]
    fn test_default_cells_follow_column_defaults() {
        let columns = vec![
            column(10, ColumnOptions::Text {}),
            column(11, ColumnOptions::select(&["A", "B"], Some("B"))),
            column(12, ColumnOptions::select(&["A", "B"], None)),
        ];

        let cells = default_cells_for_row(5, &columns);
        assert_eq!(
            cells,
            vec![
                CreateVCellInput {
                    row_id: 5,
                    column_id: 10,
                    value: None,
                },
                CreateVCellInput {
                    row_id: 5,
                    column_id: 11,
                    value: Some("B".to_string()),
                },
                CreateVCellInput {
                    row_id: 5,
                    column_id: 12,
                    value: None,
                },
            ]
        );
        assert!(default_cells_for_row(5, &[]).is_empty());
    }

    #[test]
    fn test_cell_key_format() {
        assert_eq!(cell_key(3, 14), "3-14");
    }

    #[test]
    fn test_bulk_input_deserialises_null_values() {
        let input: BulkUpdateCellsInput = serde_json::from_str(
            r#"{"cells":[{"row_id":1,"column_id":2,"value":null},{"row_id":1,"column_id":3,"value":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(input.cells.len(), 2);
        assert_eq!(input.cells[0].value, None);
        assert_eq!(input.cells[1].value.as_deref(), Some("x"));
    }
}
