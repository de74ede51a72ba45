//! # catalog-db: Hierarchy Store for the Catalog Editor
//!
//! Persists categories and products in SQLite through sqlx and runs the
//! multi-row operations (cascade delete, renumbering, moves) as
//! transactions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  Editor dispatcher (Action::DeleteCategory)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     catalog-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ CategoryRepo   │   │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo    │   │              │  │   │
//! │  │   └───────────────┘    └───────┬────────┘   └──────────────┘  │   │
//! │  │                                │ closure, close_gaps,          │   │
//! │  │                                │ check_reparent                │   │
//! │  │                                ▼                               │   │
//! │  │                         catalog-core                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/catalog.db                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Category and product repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/catalog.db")).await?;
//!
//! let fruits = db.categories().add("Fruits", None).await?;
//! db.products().add("Lemon", "Sour", fruits.id).await?;
//! db.categories().delete_cascade(fruits.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::{CascadeReport, CategoryRepository};
pub use repository::product::ProductRepository;
