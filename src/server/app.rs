use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{cells, columns, health, rows, tables};
use crate::services::VTableService;

#[derive(Clone)]
pub struct AppState {
    pub service: VTableService,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "VTable API", description = "Spreadsheet-style tables backed by SQLite"),
    paths(
        health::health_check,
        tables::create_table,
        tables::list_tables,
        tables::get_table,
        tables::update_table,
        tables::delete_table,
        tables::add_column,
        tables::add_row,
        columns::update_column,
        columns::delete_column,
        rows::delete_row,
        cells::update_cell,
        cells::bulk_update_cells,
    ),
    components(schemas(
        tables::CreateTableRequest,
        tables::UpdateTableRequest,
        tables::AddColumnRequest,
        columns::UpdateColumnRequest,
        cells::UpdateCellRequest,
        crate::database::ColumnType,
        crate::services::CellPositionUpdate,
        crate::services::BulkUpdateCellsInput,
        crate::services::BulkUpdateCellsResult,
        super::handlers::ErrorResponse,
    ))
)]
pub struct ApiDoc;

pub async fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    let state = AppState {
        service: VTableService::new(db),
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))

        // API v1 routes
        .nest("/api/v1", api_v1_routes())

        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))

        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Table routes
        .route("/tables", get(tables::list_tables))
        .route("/tables", post(tables::create_table))
        .route("/tables/:id", get(tables::get_table))
        .route("/tables/:id", put(tables::update_table))
        .route("/tables/:id", delete(tables::delete_table))
        .route("/tables/:id/columns", post(tables::add_column))
        .route("/tables/:id/rows", post(tables::add_row))

        // Column routes
        .route("/columns/:id", put(columns::update_column))
        .route("/columns/:id", delete(columns::delete_column))

        // Row routes
        .route("/rows/:id", delete(rows::delete_row))

        // Cell routes
        .route("/cells", put(cells::update_cell))
        .route("/cells/bulk", put(cells::bulk_update_cells))
}
