use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(feature = "server")]
use utoipa::ToSchema;

use super::{double_option, validate_id, validate_name, validate_owner_id, ApiError, ApiResult};
use crate::database::entities::vtables;
use crate::database::ColumnType;
use crate::errors::VTableError;
use crate::server::app::AppState;
use crate::services::{
    AddVTableColumnServiceInput, AssembledVTable, CreateVTableServiceInput,
    UpdateVTableServiceInput,
};

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CreateTableRequest {
    pub name: String,
    pub owner_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct UpdateTableRequest {
    pub name: Option<String>,
    /// `null` clears the owner, omitting the field leaves it unchanged
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "server", schema(value_type = Option<String>))]
    pub owner_id: Option<Option<String>>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct AddColumnRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[cfg_attr(feature = "server", schema(value_type = Option<Object>))]
    pub options: Option<Value>,
}

#[derive(Deserialize)]
pub struct ListTablesQuery {
    pub owner_id: Option<String>,
}

#[cfg(feature = "server")]
#[utoipa::path(
    post,
    path = "/api/v1/tables",
    request_body = crate::server::handlers::tables::CreateTableRequest,
    responses(
        (status = 200, description = "Table created with default columns and one row", body = crate::services::AssembledVTable),
        (status = 400, description = "Invalid request", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn create_table(
    State(state): State<AppState>,
    Json(payload): Json<CreateTableRequest>,
) -> ApiResult<AssembledVTable> {
    let input = CreateVTableServiceInput {
        name: validate_name(&payload.name)?,
        owner_id: payload
            .owner_id
            .as_deref()
            .map(validate_owner_id)
            .transpose()?,
    };

    let table = state.service.create_table(input).await?;
    Ok(Json(table))
}

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/tables",
    params(
        ("owner_id" = Option<String>, Query, description = "Only tables owned by this user")
    ),
    responses(
        (status = 200, description = "List tables", body = [crate::database::entities::vtables::Model])
    )
)]
pub async fn list_tables(
    State(state): State<AppState>,
    Query(query): Query<ListTablesQuery>,
) -> ApiResult<Vec<vtables::Model>> {
    let owner_id = query.owner_id.as_deref().map(validate_owner_id).transpose()?;

    let tables = state.service.get_tables(owner_id.as_deref()).await?;
    Ok(Json(tables))
}

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/tables/{id}",
    params(
        ("id" = i32, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "Assembled table", body = crate::services::AssembledVTable),
        (status = 404, description = "Table not found", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn get_table(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<AssembledVTable> {
    let id = validate_id(id, "table id")?;

    let table = state
        .service
        .get_table(id)
        .await?
        .ok_or(VTableError::TableNotFound(id))?;
    Ok(Json(table))
}

#[cfg(feature = "server")]
#[utoipa::path(
    put,
    path = "/api/v1/tables/{id}",
    params(
        ("id" = i32, Path, description = "Table ID")
    ),
    request_body = crate::server::handlers::tables::UpdateTableRequest,
    responses(
        (status = 200, description = "Table updated", body = crate::database::entities::vtables::Model),
        (status = 404, description = "Table not found", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn update_table(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTableRequest>,
) -> ApiResult<vtables::Model> {
    let id = validate_id(id, "table id")?;

    let name = payload.name.as_deref().map(validate_name).transpose()?;
    let owner_id = match payload.owner_id {
        Some(Some(owner)) => Some(Some(validate_owner_id(&owner)?)),
        other => other,
    };

    let table = state
        .service
        .update_table(UpdateVTableServiceInput { id, name, owner_id })
        .await?
        .ok_or(VTableError::TableNotFound(id))?;
    Ok(Json(table))
}

#[cfg(feature = "server")]
#[utoipa::path(
    delete,
    path = "/api/v1/tables/{id}",
    params(
        ("id" = i32, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "Deleted table", body = crate::database::entities::vtables::Model),
        (status = 404, description = "Table not found", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn delete_table(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<vtables::Model> {
    let id = validate_id(id, "table id")?;

    let table = state
        .service
        .delete_table(id)
        .await?
        .ok_or(VTableError::TableNotFound(id))?;
    Ok(Json(table))
}

#[cfg(feature = "server")]
#[utoipa::path(
    post,
    path = "/api/v1/tables/{id}/columns",
    params(
        ("id" = i32, Path, description = "Table ID")
    ),
    request_body = crate::server::handlers::tables::AddColumnRequest,
    responses(
        (status = 200, description = "Column added; existing rows get no cell for it", body = crate::services::AssembledVTable),
        (status = 400, description = "Options do not match the column type", body = crate::server::handlers::ErrorResponse),
        (status = 404, description = "Table not found", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn add_column(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AddColumnRequest>,
) -> ApiResult<AssembledVTable> {
    let table_id = validate_id(id, "table id")?;

    let input = AddVTableColumnServiceInput {
        table_id,
        name: validate_name(&payload.name)?,
        column_type: payload.column_type,
        options: payload.options,
    };

    let table = state
        .service
        .add_column(input)
        .await?
        .ok_or(VTableError::TableNotFound(table_id))?;
    Ok(Json(table))
}

#[cfg(feature = "server")]
#[utoipa::path(
    post,
    path = "/api/v1/tables/{id}/rows",
    params(
        ("id" = i32, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "Row added with default cells", body = crate::services::AssembledVTable),
        (status = 404, description = "Table not found", body = crate::server::handlers::ErrorResponse)
    )
)]
pub async fn add_row(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AssembledVTable>, ApiError> {
    let table_id = validate_id(id, "table id")?;

    let table = state
        .service
        .add_row(table_id)
        .await?
        .ok_or(VTableError::TableNotFound(table_id))?;
    Ok(Json(table))
}
