//! # catalog-editor: Catalog Tree Editor
//!
//! Orchestration layer between the UI and the hierarchy store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Editor                                  │
//! │                                                                         │
//! │  UI (tree view, product list, dialogs, drag and drop)                  │
//! │       │                                      ▲                          │
//! │       │ Action (JSON)                        │ render_tree              │
//! │       ▼                                      │ render_products          │
//! │  ┌────────────────────────────────────┐      │ notify                   │
//! │  │  handler.rs   CatalogEditor        │──────┘                          │
//! │  │  dialog.rs    Dialog, Clipboard    │       sink.rs   ViewSink        │
//! │  │  action.rs    Action, Outcome      │                                 │
//! │  │  config.rs    EditorConfig         │                                 │
//! │  │  error.rs     ApiError             │                                 │
//! │  └────────────────────────────────────┘                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  catalog-db (SQLite)  ──►  catalog-core (tree rules)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use catalog_db::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod action;
pub mod config;
pub mod dialog;
pub mod error;
pub mod handler;
pub mod sink;

pub use action::{Action, Outcome};
pub use config::{ConfigError, ConfigSource, EditorConfig};
pub use dialog::{Clipboard, Dialog, DialogInput};
pub use error::{ApiError, ErrorCode};
pub use handler::CatalogEditor;
pub use sink::{JsonLinesSink, Notice, NoticeLevel, ViewSink};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=catalog_db=trace` - Show trace for the store only
/// - Otherwise `filter` (from the config, `info,catalog=debug,sqlx=warn`
///   by default)
///
/// Logs go to stderr; stdout carries view events.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing already initialized");
    }
}

/// Opens (and migrates) the catalog named by `config`.
pub async fn open_database(config: &EditorConfig) -> Result<Database, ApiError> {
    let db_config = config.db_config()?;
    info!(path = ?db_config.database_path, "Opening catalog");

    let db = Database::new(db_config).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_open_in_memory_catalog() {
        let mut config = EditorConfig::default();
        config.database.path = Some(PathBuf::from(config::MEMORY_DATABASE));

        let db = open_database(&config).await.unwrap();
        assert!(db.health_check().await);
        assert_eq!(db.categories().count().await.unwrap(), 0);
    }
}
