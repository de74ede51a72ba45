//! # Repository Module
//!
//! Hierarchy store operations, one repository per collection.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Hierarchy Store                                      │
//! │                                                                         │
//! │  Editor dispatcher                                                     │
//! │       │                                                                 │
//! │       │  db.categories().delete_cascade(id)                            │
//! │       ▼                                                                 │
//! │  CategoryRepository                    ProductRepository               │
//! │  ├── add / rename                      ├── add / edit                  │
//! │  ├── delete_cascade                    ├── delete                      │
//! │  ├── recalculate_order                 ├── recalculate_order           │
//! │  ├── update_parent / move_to           ├── update_category / move_to   │
//! │  └── children / descendants / tree     └── list_by_category            │
//! │       │                                      │                          │
//! │       └──────────── sequence.rs ─────────────┘                          │
//! │                     (sort_order writes)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category tree
//! - [`ProductRepository`](product::ProductRepository) - Products per category

pub mod category;
pub mod product;
mod sequence;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::{DbError, DbResult};

/// Opens a write transaction.
pub(crate) async fn begin(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    pool.begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

/// Commits `tx`. Deferred foreign key failures surface here.
pub(crate) async fn commit(tx: Transaction<'static, Sqlite>) -> DbResult<()> {
    tx.commit().await.map_err(|e| match e {
        sqlx::Error::Database(_) => DbError::from(e),
        other => DbError::TransactionFailed(other.to_string()),
    })
}
