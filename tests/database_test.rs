//! Database functionality tests
//!
//! Tests for migrations, repository operations and cascade integrity

use anyhow::Result;
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use tempfile::NamedTempFile;
use vtable::database::entities::*;
use vtable::database::*;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

/// Table with two text columns and two rows, fully populated
async fn seed_grid(repo: &VTableRepository<'_, DatabaseConnection>, name: &str) -> Result<i32> {
    let table = repo.create_table(name, None).await?;

    let mut columns = Vec::new();
    for column_name in ["A", "B"] {
        columns.push(
            repo.create_column(CreateVColumnInput {
                table_id: table.id,
                name: column_name.to_string(),
                column_type: ColumnType::Text,
                options: None,
            })
            .await?,
        );
    }

    for _ in 0..2 {
        let row = repo.create_row(table.id).await?;
        let cells = columns
            .iter()
            .map(|column| CreateVCellInput {
                row_id: row.id,
                column_id: column.id,
                value: Some(format!("{}-{}", row.id, column.name)),
            })
            .collect();
        repo.bulk_create_cells(cells).await?;
    }

    Ok(table.id)
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    // Verify all tables exist by attempting to query them
    assert_eq!(users::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(vtables::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(vcolumns::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(vrows::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(vcells::Entity::find().all(&db).await?.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_bulk_create_returns_created_cells() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = VTableRepository::new(&db);
    let table_id = seed_grid(&repo, "Grid").await?;

    let cells = repo.get_cells_for_table(table_id).await?;
    assert_eq!(cells.len(), 4);

    let row = repo.create_row(table_id).await?;
    let columns = repo.get_columns_for_table(table_id).await?;
    let created = repo
        .bulk_create_cells(
            columns
                .iter()
                .map(|column| CreateVCellInput {
                    row_id: row.id,
                    column_id: column.id,
                    value: None,
                })
                .collect(),
        )
        .await?;

    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|cell| cell.row_id == row.id && cell.value.is_none()));

    Ok(())
}

#[tokio::test]
async fn test_get_full_table() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = VTableRepository::new(&db);
    let table_id = seed_grid(&repo, "Grid").await?;
    seed_grid(&repo, "Other").await?;

    let data = repo.get_full_table(table_id).await?.unwrap();
    assert_eq!(data.table.name, "Grid");
    assert_eq!(data.columns.len(), 2);
    assert_eq!(data.rows.len(), 2);
    assert_eq!(data.cells.len(), 4);
    assert!(data.rows.windows(2).all(|pair| pair[0].id < pair[1].id));

    assert!(repo.get_full_table(99_999).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_row_delete_cascades_to_its_cells_only() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = VTableRepository::new(&db);
    let table_id = seed_grid(&repo, "Grid").await?;
    let rows = repo.get_rows_for_table(table_id).await?;

    repo.delete_row(rows[0].id).await?;

    assert!(repo.get_cells_for_row(rows[0].id).await?.is_empty());
    assert_eq!(repo.get_cells_for_row(rows[1].id).await?.len(), 2);
    assert_eq!(vcells::Entity::find().count(&db).await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_column_delete_cascades_to_its_cells_only() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = VTableRepository::new(&db);
    let table_id = seed_grid(&repo, "Grid").await?;
    let columns = repo.get_columns_for_table(table_id).await?;

    let deleted = repo.delete_column(columns[0].id).await?.unwrap();
    assert_eq!(deleted.name, "A");

    assert!(repo.get_cells_for_column(columns[0].id).await?.is_empty());
    assert_eq!(repo.get_cells_for_column(columns[1].id).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_table_delete_leaves_other_tables() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = VTableRepository::new(&db);
    let doomed = seed_grid(&repo, "Doomed").await?;
    let kept = seed_grid(&repo, "Kept").await?;

    repo.delete_table(doomed).await?;

    assert_eq!(vtables::Entity::find().count(&db).await?, 1);
    assert_eq!(vcolumns::Entity::find().count(&db).await?, 2);
    assert_eq!(vrows::Entity::find().count(&db).await?, 2);
    assert_eq!(vcells::Entity::find().count(&db).await?, 4);
    assert_eq!(repo.get_cells_for_table(kept).await?.len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_owner_delete_keeps_tables() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = VTableRepository::new(&db);
    let owner = repo
        .create_user("00000000-0000-0000-0000-000000000042", "Owner")
        .await?;
    let table = repo.create_table("Owned", Some(owner.id.clone())).await?;

    users::Entity::delete_by_id(owner.id).exec(&db).await?;

    let table = repo.get_table(table.id).await?.unwrap();
    assert_eq!(table.owner_id, None);

    Ok(())
}

#[tokio::test]
async fn test_get_cells_filters() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = VTableRepository::new(&db);
    let table_id = seed_grid(&repo, "Grid").await?;
    seed_grid(&repo, "Other").await?;
    let rows = repo.get_rows_for_table(table_id).await?;

    let by_table = repo
        .get_cells(GetVCellsInput {
            table_id: Some(table_id),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_table.len(), 4);

    let by_row = repo
        .get_cells(GetVCellsInput {
            row_id: Some(rows[1].id),
            table_id: Some(table_id),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_row.len(), 2);

    assert_eq!(repo.get_cells(GetVCellsInput::default()).await?.len(), 8);

    Ok(())
}
