use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use utoipa::ToSchema;

use super::{validate_id, ApiResult};
use crate::database::entities::vcells;
use crate::errors::VTableError;
use crate::server::app::AppState;
use crate::services::{BulkUpdateCellsInput, BulkUpdateCellsResult, UpdateVTableCellServiceInput};

/// Address a cell by `id`, or by `row_id` and `column_id` together.
/// An `id` wins when both are sent.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct UpdateCellRequest {
    pub id: Option<i32>,
    pub row_id: Option<i32>,
    pub column_id: Option<i32>,
    pub value: Option<String>,
}

#[cfg(feature = "server")]
#[utoipa::path(
    put,
    path = "/api/v1/cells",
    request_body = crate::server::handlers::cells::UpdateCellRequest,
    responses(
        (status = 200, description = "Updated cell", body = crate::database::entities::vcells::Model),
        (status = 400, description = "Cell address missing or incomplete", body = crate::server::handlers::ErrorResponse),
        (status = 404, description = "No cell at that address", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn update_cell(
    State(state): State<AppState>,
    Json(payload): Json<UpdateCellRequest>,
) -> ApiResult<vcells::Model> {
    let input = UpdateVTableCellServiceInput {
        id: payload.id.map(|id| validate_id(id, "cell id")).transpose()?,
        row_id: payload.row_id.map(|id| validate_id(id, "row_id")).transpose()?,
        column_id: payload
            .column_id
            .map(|id| validate_id(id, "column_id"))
            .transpose()?,
        value: payload.value,
    };

    let address = match (input.id, input.row_id, input.column_id) {
        (Some(id), _, _) => format!("id {}", id),
        (None, row_id, column_id) => format!("row {:?}, column {:?}", row_id, column_id),
    };

    let cell = state
        .service
        .update_cell(input)
        .await?
        .ok_or(VTableError::CellNotFound(address))?;
    Ok(Json(cell))
}

#[cfg(feature = "server")]
#[utoipa::path(
    put,
    path = "/api/v1/cells/bulk",
    request_body = crate::services::BulkUpdateCellsInput,
    responses(
        (status = 200, description = "Number of existing cells updated", body = crate::services::BulkUpdateCellsResult),
        (status = 400, description = "Invalid cell position", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn bulk_update_cells(
    State(state): State<AppState>,
    Json(payload): Json<BulkUpdateCellsInput>,
) -> ApiResult<BulkUpdateCellsResult> {
    for cell in &payload.cells {
        validate_id(cell.row_id, "row_id")?;
        validate_id(cell.column_id, "column_id")?;
    }

    let result = state.service.bulk_update_cells(payload).await?;
    Ok(Json(result))
}
