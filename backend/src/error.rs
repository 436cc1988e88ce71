//! Store error handling
//!
//! Unified error type for the service layer. Repository failures arrive as
//! `anyhow::Error` or `sqlx::Error` and are classified here.

use fitform_shared::AnalysisError;
use thiserror::Error;

/// Postgres SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Service-layer error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid analysis result: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    /// Classify a repository failure, surfacing unique violations as conflicts
    pub fn from_repository(err: anyhow::Error, conflict_message: &str) -> Self {
        match err.downcast::<sqlx::Error>() {
            Ok(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Conflict(conflict_message.to_string())
            }
            Ok(sqlx_err) => StoreError::Database(sqlx_err),
            Err(other) => StoreError::Internal(other),
        }
    }
}

/// Result type alias for service operations
pub type StoreResult<T> = Result<T, StoreError>;
