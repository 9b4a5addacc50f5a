use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::*;
use tracing::info;

use crate::database::entities::vtables;
use crate::database::{CreateVCellInput, VTableRepository};
use crate::services::DEFAULT_COLUMNS;

pub const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000000";
pub const DEMO_USER_NAME: &str = "Demo User";

const DEMO_ROWS: usize = 3;
const STATUSES: [&str; 3] = ["To Do", "In Progress", "Done"];
const PRIORITIES: [&str; 3] = ["Low", "Medium", "High"];

struct DemoTable {
    name: &'static str,
    titles: [&'static str; 5],
}

const DEMO_TABLES: [DemoTable; 3] = [
    DemoTable {
        name: "Project Tasks",
        titles: [
            "Implement user authentication",
            "Design dashboard UI",
            "Set up CI/CD pipeline",
            "Write API documentation",
            "Fix navigation bug",
        ],
    },
    DemoTable {
        name: "Meeting Notes",
        titles: [
            "Weekly standup",
            "Product review",
            "Sprint planning",
            "Retrospective",
            "Client presentation",
        ],
    },
    DemoTable {
        name: "Product Roadmap",
        titles: [
            "User profile feature",
            "Payment integration",
            "Mobile app release",
            "Analytics dashboard",
            "Performance optimization",
        ],
    },
];

/// Create the demo user and its sample tables. Tables that already exist for
/// the demo user are left alone, so running the seed twice is harmless.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<()> {
    let repo = VTableRepository::new(db);

    if repo.get_user(DEMO_USER_ID).await?.is_none() {
        info!("Creating demo user");
        repo.create_user(DEMO_USER_ID, DEMO_USER_NAME).await?;
    } else {
        info!("Demo user already exists");
    }

    for demo in DEMO_TABLES.iter() {
        let existing = vtables::Entity::find()
            .filter(vtables::Column::Name.eq(demo.name))
            .filter(vtables::Column::OwnerId.eq(DEMO_USER_ID))
            .one(db)
            .await?;

        if existing.is_some() {
            info!("Demo table '{}' already exists, skipping", demo.name);
            continue;
        }

        create_demo_table(db, demo).await?;
    }

    info!("Seed completed");
    Ok(())
}

async fn create_demo_table(db: &DatabaseConnection, demo: &DemoTable) -> Result<()> {
    info!("Creating demo table: {}", demo.name);

    let txn = db.begin().await?;
    let repo = VTableRepository::new(&txn);

    let table = repo
        .create_table(demo.name, Some(DEMO_USER_ID.to_string()))
        .await?;

    let mut columns = Vec::with_capacity(DEFAULT_COLUMNS.len());
    for definition in DEFAULT_COLUMNS.iter() {
        columns.push(repo.create_column(definition.to_input(table.id)).await?);
    }

    let today = Utc::now().date_naive();
    for i in 0..DEMO_ROWS {
        let row = repo.create_row(table.id).await?;

        let cells = columns
            .iter()
            .map(|column| {
                let value = match column.name.as_str() {
                    "Title" => Some(demo.titles[i % demo.titles.len()].to_string()),
                    "Status" => Some(STATUSES[i % STATUSES.len()].to_string()),
                    "Date" => Some(
                        (today + Duration::days(5 * i as i64))
                            .format("%Y-%m-%d")
                            .to_string(),
                    ),
                    "Priority" => Some(PRIORITIES[i % PRIORITIES.len()].to_string()),
                    _ => column.default_value(),
                };
                CreateVCellInput {
                    row_id: row.id,
                    column_id: column.id,
                    value,
                }
            })
            .collect();

        repo.bulk_create_cells(cells).await?;
    }

    txn.commit().await?;

    info!("Created demo table {} ({})", table.id, demo.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;
    use crate::services::VTableService;

    #[tokio::test]
    async fn test_seed_creates_demo_tables() {
        let db = setup_test_db().await;
        seed_demo_data(&db).await.unwrap();

        let service = VTableService::new(db.clone());
        let tables = service.get_tables(Some(DEMO_USER_ID)).await.unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Project Tasks", "Meeting Notes", "Product Roadmap"]);

        let view = service.get_table(tables[0].id).await.unwrap().unwrap();
        assert_eq!(view.rows.len(), DEMO_ROWS);
        assert_eq!(view.cells.len(), DEMO_ROWS * DEFAULT_COLUMNS.len());

        let title = view.column_named("Title").unwrap().id;
        let status = view.column_named("Status").unwrap().id;
        assert_eq!(
            view.value(view.rows[0].id, title),
            Some("Implement user authentication")
        );
        assert_eq!(view.value(view.rows[1].id, status), Some("In Progress"));

        let date = view.column_named("Date").unwrap().id;
        let first_date = view.value(view.rows[0].id, date).unwrap();
        assert_eq!(first_date, Utc::now().date_naive().format("%Y-%m-%d").to_string());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = setup_test_db().await;
        seed_demo_data(&db).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        let tables = VTableRepository::new(&db).get_tables(None).await.unwrap();
        assert_eq!(tables.len(), DEMO_TABLES.len());
    }
}
