//! # API Error Type
//!
//! Unified error type for editor actions.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Catalog Editor                     │
//! │                                                                         │
//! │  UI event → Action → CatalogEditor::dispatch                           │
//! │                          │                                              │
//! │     Dialog validation ───┤  ValidationError ─┐                          │
//! │     Tree rule          ──┤  CoreError ───────┤                          │
//! │     Storage            ──┘  DbError ─────────┴──► ApiError              │
//! │                                                      │                  │
//! │                                                      ▼                  │
//! │                       ViewSink::notify(failure), no view refresh        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage details are logged, never shown: the UI gets a generic message
//! and a machine-readable `code`.

use catalog_core::{CoreError, ValidationError};
use catalog_db::DbError;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Error returned from [`CatalogEditor::dispatch`](crate::handler::CatalogEditor::dispatch).
///
/// ## Serialization
/// ```json
/// {
///   "code": "CYCLE_ERROR",
///   "message": "Moving category 1 under 5 would create a cycle"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for action failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Empty label, malformed ordering, meaningless drop
    ValidationError,

    /// Target id does not exist
    NotFound,

    /// Parent or owning category does not exist
    ReferenceError,

    /// Reparent would create a cycle
    CycleError,

    /// The store failed; nothing was refreshed
    StorageError,

    /// Anything else (configuration, wire format)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn storage(message: &str) -> Self {
        ApiError::new(ErrorCode::StorageError, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            DbError::Reference { .. } => ApiError::new(ErrorCode::ReferenceError, err.to_string()),
            DbError::Cycle { .. } => ApiError::new(ErrorCode::CycleError, err.to_string()),
            DbError::Validation(e) => ApiError::validation(e.to_string()),
            DbError::InvalidDrop(message) => ApiError::validation(message),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ReferenceError, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::storage("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::storage("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::storage("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::storage("Database transaction failed")
            }
            DbError::PoolExhausted => ApiError::storage("Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::storage("Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::Reference { .. } => {
                ApiError::new(ErrorCode::ReferenceError, err.to_string())
            }
            CoreError::Cycle { .. } => ApiError::new(ErrorCode::CycleError, err.to_string()),
            CoreError::InvalidDrop(message) => ApiError::validation(message),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
