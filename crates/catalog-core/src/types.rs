//! # Domain Types
//!
//! Records persisted by the hierarchy store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐            ┌─────────────────────┐            │
//! │  │      Category       │ 1       *  │       Product       │            │
//! │  │  ─────────────────  │◄───────────│  ─────────────────  │            │
//! │  │  id (store-assigned)│            │  id (store-assigned)│            │
//! │  │  label              │            │  label              │            │
//! │  │  parent_id ─┐       │            │  description        │            │
//! │  │  order      │       │            │  category_id (FK)   │            │
//! │  └─────────────┼───────┘            │  order              │            │
//! │        ▲       │ None = root        └─────────────────────┘            │
//! │        └───────┘                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sibling Groups
//! `order` is only meaningful inside a sibling group:
//! - categories sharing the same `parent_id` (the root sentinel is `None`)
//! - products sharing the same `category_id`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identifier of a category, assigned by the store on creation.
pub type CategoryId = i64;

/// Identifier of a product, assigned by the store on creation.
pub type ProductId = i64;

// =============================================================================
// Category
// =============================================================================

/// A node of the catalog tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    /// Store-assigned identifier, immutable.
    pub id: CategoryId,

    /// Display label, never empty.
    pub label: String,

    /// Parent category, `None` for top-level categories.
    pub parent_id: Option<CategoryId>,

    /// Zero-based position among siblings.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "sort_order"))]
    pub order: i64,

    #[ts(as = "String")]
    pub created: DateTime<Utc>,

    /// Bumped on rename and reparent.
    #[ts(as = "String")]
    pub modified: DateTime<Utc>,
}

impl Category {
    /// True for top-level categories.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A leaf item attached to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    /// Product name.
    pub label: String,

    pub description: String,

    /// Owning category.
    pub category_id: CategoryId,

    /// Zero-based position among the products of `category_id`.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "sort_order"))]
    pub order: i64,

    #[ts(as = "String")]
    pub created: DateTime<Utc>,

    #[ts(as = "String")]
    pub modified: DateTime<Utc>,
}

// =============================================================================
// Copies
// =============================================================================

/// Label given to a pasted copy.
///
/// ```rust
/// use catalog_core::types::copy_label;
///
/// assert_eq!(copy_label("Citrus"), "Citrus (copy)");
/// ```
pub fn copy_label(source: &str) -> String {
    format!("{}{}", source, crate::COPY_SUFFIX)
}

// =============================================================================
// Unit Tests
// =============================================================================
