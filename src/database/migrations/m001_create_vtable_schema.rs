use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create tables table
        manager
            .create_table(
                Table::create()
                    .table(VTables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VTables::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VTables::Name).string().not_null())
                    .col(ColumnDef::new(VTables::OwnerId).string())
                    .col(ColumnDef::new(VTables::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_v_tables_owner_id")
                            .from(VTables::Table, VTables::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create columns table
        manager
            .create_table(
                Table::create()
                    .table(VColumns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VColumns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VColumns::TableId).integer().not_null())
                    .col(ColumnDef::new(VColumns::Name).string().not_null())
                    .col(ColumnDef::new(VColumns::Type).string().not_null())
                    .col(ColumnDef::new(VColumns::Options).text().not_null().default("{}"))
                    .col(ColumnDef::new(VColumns::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_v_columns_table_id")
                            .from(VColumns::Table, VColumns::TableId)
                            .to(VTables::Table, VTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create rows table
        manager
            .create_table(
                Table::create()
                    .table(VRows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VRows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VRows::TableId).integer().not_null())
                    .col(ColumnDef::new(VRows::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_v_rows_table_id")
                            .from(VRows::Table, VRows::TableId)
                            .to(VTables::Table, VTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create cells table
        manager
            .create_table(
                Table::create()
                    .table(VCells::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VCells::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VCells::RowId).integer().not_null())
                    .col(ColumnDef::new(VCells::ColumnId).integer().not_null())
                    .col(ColumnDef::new(VCells::Value).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_v_cells_row_id")
                            .from(VCells::Table, VCells::RowId)
                            .to(VRows::Table, VRows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_v_cells_column_id")
                            .from(VCells::Table, VCells::ColumnId)
                            .to(VColumns::Table, VColumns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One cell per (row, column) position
        manager
            .create_index(
                Index::create()
                    .name("idx_v_cells_row_column")
                    .table(VCells::Table)
                    .col(VCells::RowId)
                    .col(VCells::ColumnId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_v_cells_column_id")
                    .table(VCells::Table)
                    .col(VCells::ColumnId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_v_columns_table_id")
                    .table(VColumns::Table)
                    .col(VColumns::TableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_v_rows_table_id")
                    .table(VRows::Table)
                    .col(VRows::TableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VCells::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VRows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VColumns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VTables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum VTables {
    #[iden = "v_tables"]
    Table,
    Id,
    Name,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum VColumns {
    #[iden = "v_columns"]
    Table,
    Id,
    TableId,
    Name,
    Type,
    Options,
    CreatedAt,
}

#[derive(Iden)]
enum VRows {
    #[iden = "v_rows"]
    Table,
    Id,
    TableId,
    CreatedAt,
}

#[derive(Iden)]
enum VCells {
    #[iden = "v_cells"]
    Table,
    Id,
    RowId,
    ColumnId,
    Value,
}
