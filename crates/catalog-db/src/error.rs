//! # Database Error Types
//!
//! Error types for hierarchy store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      Tree rule (CoreError)                 │
//! │       │                                │                                │
//! │       └───────────────┬────────────────┘                                │
//! │                       ▼                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in editor app) ← Serialized for the UI                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Failure notice, view left unrefreshed                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use catalog_core::{CoreError, ValidationError};
use thiserror::Error;

/// Hierarchy store errors.
///
/// Tree rule violations are mirrored one-to-one from [`CoreError`] so the
/// editor can map them without looking inside a wrapper.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Rename, edit, delete or move of an id that does not exist
    /// - An id deleted by a cascade in the meantime
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A parent or owning category does not exist.
    ///
    /// ## When This Occurs
    /// - `add` under a missing parent category
    /// - Moving a product into a missing category
    #[error("{entity} {id} referenced but does not exist")]
    Reference { entity: &'static str, id: i64 },

    /// Reparenting would make a category its own ancestor.
    #[error("Moving category {category_id} under {new_parent_id} would create a cycle")]
    Cycle {
        category_id: i64,
        new_parent_id: i64,
    },

    /// Input rejected before anything was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Drop gesture with no structural meaning.
    #[error("Invalid drop: {0}")]
    InvalidDrop(String),

    /// Foreign key constraint violation reported by SQLite at commit.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a category id.
    pub fn category_not_found(id: i64) -> Self {
        DbError::NotFound {
            entity: "Category",
            id,
        }
    }

    /// Creates a NotFound error for a product id.
    pub fn product_not_found(id: i64) -> Self {
        DbError::NotFound {
            entity: "Product",
            id,
        }
    }

    /// Creates a Reference error for a missing category.
    pub fn missing_category(id: i64) -> Self {
        DbError::Reference {
            entity: "Category",
            id,
        }
    }

    /// True for errors raised by storage rather than by a rule check.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            DbError::ForeignKeyViolation { .. }
                | DbError::ConnectionFailed(_)
                | DbError::MigrationFailed(_)
                | DbError::QueryFailed(_)
                | DbError::TransactionFailed(_)
                | DbError::PoolExhausted
                | DbError::Internal(_)
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
///
/// `RowNotFound` is never produced here: repositories use `fetch_optional`
/// and report the missing id themselves.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "FOREIGN KEY constraint failed" is raised at COMMIT for
                // deferred constraints.
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => DbError::NotFound { entity, id },
            CoreError::Reference { entity, id } => DbError::Reference { entity, id },
            CoreError::Cycle {
                category_id,
                new_parent_id,
            } => DbError::Cycle {
                category_id,
                new_parent_id,
            },
            CoreError::InvalidDrop(message) => DbError::InvalidDrop(message),
            CoreError::Validation(err) => DbError::Validation(err),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
