//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CoreError        - Tree rule violations (missing, cycle, ...)     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  catalog-db errors (separate crate)                                    │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  editor errors (in app)                                                │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Tree rule violations.
///
/// Raised by the pure hierarchy algorithms before anything is written.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The operation targets an id that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A foreign key (parent, owning category) points nowhere.
    ///
    /// ## When This Occurs
    /// - Adding a sub-category under a deleted parent
    /// - Adding or moving a product into a missing category
    #[error("{entity} {id} referenced but does not exist")]
    Reference { entity: &'static str, id: i64 },

    /// Reparenting would make a category its own ancestor.
    ///
    /// ## Example
    /// ```text
    /// Fruits ─► Citrus ─► Lemons
    ///
    /// move Fruits under Lemons  →  Cycle { category_id: Fruits, new_parent_id: Lemons }
    /// ```
    #[error("Moving category {category_id} under {new_parent_id} would create a cycle")]
    Cycle {
        category_id: i64,
        new_parent_id: i64,
    },

    /// A drop gesture that has no structural meaning
    /// (e.g. a category dropped into a product list).
    #[error("Invalid drop: {0}")]
    InvalidDrop(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a category id.
    pub fn category_not_found(id: i64) -> Self {
        CoreError::NotFound {
            entity: "Category",
            id,
        }
    }

    /// Creates a NotFound error for a product id.
    pub fn product_not_found(id: i64) -> Self {
        CoreError::NotFound {
            entity: "Product",
            id,
        }
    }

    /// Creates a Reference error for a missing category.
    pub fn missing_category(id: i64) -> Self {
        CoreError::Reference {
            entity: "Category",
            id,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are always raised before any persistence call, so a failed
/// validation never leaves partial state behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// The same id appears twice in an ordering.
    #[error("{field} lists id {value} more than once")]
    Duplicate { field: String, value: i64 },

    /// An ordering does not cover exactly one sibling group.
    #[error("{field} must list exactly the {expected} members of one sibling group, got {actual}")]
    IncompleteGroup {
        field: String,
        expected: usize,
        actual: usize,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
