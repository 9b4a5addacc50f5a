use axum::{
    extract::{Path, State},
    response::Json,
};

use super::{validate_id, ApiResult};
use crate::errors::VTableError;
use crate::server::app::AppState;
use crate::services::AssembledVTable;

#[cfg(feature = "server")]
#[utoipa::path(
    delete,
    path = "/api/v1/rows/{id}",
    params(
        ("id" = i32, Path, description = "Row ID")
    ),
    responses(
        (status = 200, description = "Owning table after the row and its cells are removed", body = crate::services::AssembledVTable),
        (status = 404, description = "Row not found", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn delete_row(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<AssembledVTable> {
    let id = validate_id(id, "row id")?;

    let table = state
        .service
        .delete_row(id)
        .await?
        .ok_or(VTableError::RowNotFound(id))?;
    Ok(Json(table))
}
