use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(feature = "server")]
use utoipa::ToSchema;

use super::{validate_id, validate_name, ApiResult};
use crate::database::ColumnType;
use crate::errors::VTableError;
use crate::server::app::AppState;
use crate::services::{AssembledVTable, UpdateVTableColumnServiceInput};

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct UpdateColumnRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub column_type: Option<ColumnType>,
    #[cfg_attr(feature = "server", schema(value_type = Option<Object>))]
    pub options: Option<Value>,
}

#[cfg(feature = "server")]
#[utoipa::path(
    put,
    path = "/api/v1/columns/{id}",
    params(
        ("id" = i32, Path, description = "Column ID")
    ),
    request_body = crate::server::handlers::columns::UpdateColumnRequest,
    responses(
        (status = 200, description = "Owning table after the update", body = crate::services::AssembledVTable),
        (status = 400, description = "Options do not match the column type", body = crate::server::handlers::ErrorResponse),
        (status = 404, description = "Column not found", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn update_column(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateColumnRequest>,
) -> ApiResult<AssembledVTable> {
    let id = validate_id(id, "column id")?;

    let input = UpdateVTableColumnServiceInput {
        id,
        name: payload.name.as_deref().map(validate_name).transpose()?,
        column_type: payload.column_type,
        options: payload.options,
    };

    let table = state
        .service
        .update_column(input)
        .await?
        .ok_or(VTableError::ColumnNotFound(id))?;
    Ok(Json(table))
}

#[cfg(feature = "server")]
#[utoipa::path(
    delete,
    path = "/api/v1/columns/{id}",
    params(
        ("id" = i32, Path, description = "Column ID")
    ),
    responses(
        (status = 200, description = "Owning table after the column and its cells are removed", body = crate::services::AssembledVTable),
        (status = 404, description = "Column not found", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn delete_column(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<AssembledVTable> {
    let id = validate_id(id, "column id")?;

    let table = state
        .service
        .delete_column(id)
        .await?
        .ok_or(VTableError::ColumnNotFound(id))?;
    Ok(Json(table))
}
