//! Service integration tests
//!
//! Walks a table through its full lifecycle against a file-backed database

use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};
use tempfile::NamedTempFile;
use vtable::database::connection::setup_database;
use vtable::services::*;

async fn setup_test_service() -> Result<(VTableService, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db: DatabaseConnection = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((VTableService::new(db), temp_file))
}

#[tokio::test]
async fn test_task_table_lifecycle() -> Result<()> {
    let (service, _db_file) = setup_test_service().await?;

    let table = service
        .create_table(CreateVTableServiceInput {
            name: "Tasks".to_string(),
            owner_id: None,
        })
        .await?;

    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Title", "Status", "Date", "Priority"]);
    assert_eq!(table.rows.len(), 1);

    let first_row = table.rows[0].id;
    let title = table.column_named("Title").unwrap().id;
    let status = table.column_named("Status").unwrap().id;
    let date = table.column_named("Date").unwrap().id;
    let priority = table.column_named("Priority").unwrap().id;
    assert_eq!(table.value(first_row, status), Some("To Do"));
    assert_eq!(table.value(first_row, priority), Some("Medium"));
    assert_eq!(table.value(first_row, title), None);
    assert_eq!(table.value(first_row, date), None);

    let table = service.add_row(table.table.id).await?.unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.value(table.rows[1].id, status), Some("To Do"));

    let table = service.delete_column(status).await?.unwrap();
    assert_eq!(table.columns.len(), 3);
    for row in &table.rows {
        assert!(table.cell(row.id, status).is_none());
    }

    let result = service
        .bulk_update_cells(BulkUpdateCellsInput {
            cells: vec![
                CellPositionUpdate {
                    row_id: first_row,
                    column_id: title,
                    value: Some("Ship v1".to_string()),
                },
                CellPositionUpdate {
                    row_id: first_row,
                    column_id: 99_999,
                    value: Some("x".to_string()),
                },
            ],
        })
        .await?;
    assert_eq!(result.updated_count, 1);

    let table = service.get_table(table.table.id).await?.unwrap();
    assert_eq!(table.value(first_row, title), Some("Ship v1"));
    assert!(table.cell(first_row, 99_999).is_none());

    Ok(())
}

#[tokio::test]
async fn test_reads_after_delete() -> Result<()> {
    let (service, _db_file) = setup_test_service().await?;

    let table = service
        .create_table(CreateVTableServiceInput {
            name: "Scratch".to_string(),
            owner_id: None,
        })
        .await?;
    let table_id = table.table.id;

    assert!(service.delete_table(table_id).await?.is_some());
    assert!(service.get_table(table_id).await?.is_none());
    assert!(service.add_row(table_id).await?.is_none());
    assert!(service.get_tables(None).await?.is_empty());

    Ok(())
}
