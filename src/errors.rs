//! Error types for vtable operations
//!
//! Reads never fail for a missing record; they return `None` instead. The
//! variants below cover the orchestration failures that do surface to callers.
//!
//! # Examples
//!
//! ```rust
//! use vtable::errors::VTableError;
//!
//! let err = VTableError::InvalidInput("missing cell address".to_string());
//! assert!(err.is_client_error());
//! assert_eq!(err.error_code(), "VALIDATION_FAILED");
//! ```

use thiserror::Error;

/// Errors raised by the repository, service and API layers
#[derive(Error, Debug)]
pub enum VTableError {
    /// Table not found by ID
    #[error("Table {0} not found")]
    TableNotFound(i32),

    /// Column not found by ID
    #[error("Column {0} not found")]
    ColumnNotFound(i32),

    /// Row not found by ID
    #[error("Row {0} not found")]
    RowNotFound(i32),

    /// No cell matched the given address
    #[error("Cell not found: {0}")]
    CellNotFound(String),

    /// Caller supplied an unusable request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Column options do not match the column type
    #[error("Invalid column options: {0}")]
    InvalidOptions(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Options payload could not be (de)serialised
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VTableError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            VTableError::InvalidInput(_) | VTableError::InvalidOptions(_)
        )
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VTableError::TableNotFound(_)
                | VTableError::ColumnNotFound(_)
                | VTableError::RowNotFound(_)
                | VTableError::CellNotFound(_)
        )
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            VTableError::TableNotFound(_)
            | VTableError::ColumnNotFound(_)
            | VTableError::RowNotFound(_)
            | VTableError::CellNotFound(_) => "NOT_FOUND",
            VTableError::InvalidInput(_) | VTableError::InvalidOptions(_) => "VALIDATION_FAILED",
            VTableError::Database(_) | VTableError::Serialization(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for vtable operations
pub type VTableResult<T> = Result<T, VTableError>;
