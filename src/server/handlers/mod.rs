pub mod cells;
pub mod columns;
pub mod health;
pub mod rows;
pub mod tables;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::error;

#[cfg(feature = "server")]
use utoipa::ToSchema;

use crate::errors::VTableError;

/// JSON body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Handler error: a [`VTableError`] rendered as status code plus JSON body
#[derive(Debug)]
pub struct ApiError(pub VTableError);

impl From<VTableError> for ApiError {
    fn from(err: VTableError) -> Self {
        ApiError(err)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        ApiError(err.into())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Storage details stay in the log
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.0);
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: self.0.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub(crate) fn invalid(message: impl Into<String>) -> ApiError {
    ApiError(VTableError::InvalidInput(message.into()))
}

pub(crate) fn validate_id(id: i32, what: &str) -> Result<i32, ApiError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(invalid(format!("{} must be a positive integer", what)))
    }
}

pub(crate) fn validate_name(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(invalid("name must not be empty"))
    } else {
        Ok(trimmed.to_string())
    }
}

pub(crate) fn validate_owner_id(owner_id: &str) -> Result<String, ApiError> {
    uuid::Uuid::parse_str(owner_id)
        .map(|_| owner_id.to_string())
        .map_err(|_| invalid(format!("owner_id '{}' is not a valid UUID", owner_id)))
}

/// Tells an absent field apart from an explicit `null`
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
