//! # catalog-core: Pure Tree Logic for the Catalog Editor
//!
//! This crate holds every rule of the catalog tree as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Editor Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Presentation (ViewSink)                      │   │
//! │  │    Category tree ──► Product list ──► Dialogs ──► Notices       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Action / DropEvent                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    catalog-editor (handlers)                    │   │
//! │  │    add, rename, delete, paste, drop, refresh                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ hierarchy │  │ ordering  │  │  gesture  │  │   │
//! │  │   │ Category  │  │  closure  │  │ close_gaps│  │ plan_drop │  │   │
//! │  │   │  Product  │  │  cycles   │  │ positions │  │ DropPlan  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO UI • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  catalog-db (Hierarchy Store)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Category, Product)
//! - [`hierarchy`] - Child index, cascade closure, cycle checks
//! - [`ordering`] - Sibling order assignment and gap closing
//! - [`view`] - Tree flattening and sorted listings for display
//! - [`gesture`] - Drop gesture classification
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::hierarchy::ChildIndex;
//! use catalog_core::ordering::positions_for;
//!
//! let assignments = positions_for(&[7, 3, 5]);
//! assert_eq!(assignments[0].id, 7);
//! assert_eq!(assignments[2].order, 2);
//!
//! let index = ChildIndex::build(&[]);
//! assert!(index.closure(1).is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gesture;
pub mod hierarchy;
pub mod ordering;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use gesture::{plan_drop, Container, DraggedItem, DropEvent, DropPlan};
pub use hierarchy::{cascade_plan, CascadePlan, ChildIndex};
pub use ordering::{close_gaps, positions_for, OrderAssignment, Sequenced};
pub use types::*;
pub use view::{flatten, TreeRow};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Appended to the label (and description) of pasted copies.
pub const COPY_SUFFIX: &str = " (copy)";
