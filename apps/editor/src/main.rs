//! # Catalog Editor Entry Point
//!
//! Runs the editor as a line-oriented process: one JSON [`Action`] per
//! line on stdin, one JSON view event per line on stdout.
//!
//! ## Usage
//! ```bash
//! # Default config (~/.config/catalog-editor/editor.toml) and database
//! catalog-editor
//!
//! # Explicit config file
//! catalog-editor --config ./editor.toml
//!
//! # Throwaway catalog
//! CATALOG_DB_PATH=:memory: catalog-editor
//! ```
//!
//! ## Session
//! ```text
//! stdin:  {"type":"addCategory","label":"Fruits"}
//! stdout: {"event":"notice","level":"success","message":"Category \"Fruits\" saved"}
//! stdout: {"event":"tree","rows":[{"category":{...},"depth":0}]}
//! ```

use std::path::PathBuf;

use catalog_editor::{
    init_tracing, open_database, Action, ApiError, CatalogEditor, EditorConfig, JsonLinesSink,
    Notice, ViewSink,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = parse_config_arg();
    let config = EditorConfig::load(config_path)?;

    init_tracing(&config.logging.filter);
    info!("Starting catalog editor");
    config.source.log();

    let db = open_database(&config).await?;
    let mut editor = CatalogEditor::new(db.clone(), JsonLinesSink::new(std::io::stdout()));

    // initial view; a failure is already reported through the sink
    let _ = editor.dispatch(Action::LoadCategories).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Action>(line) {
            Ok(action) => {
                let _ = editor.dispatch(action).await;
            }
            Err(e) => {
                warn!(error = %e, "Unreadable action");
                let err = ApiError::validation(format!("Unreadable action: {}", e));
                editor.sink_mut().notify(Notice::failure(&err));
            }
        }
    }

    info!("Input closed, shutting down");
    db.close().await;
    Ok(())
}

/// `--config <PATH>` or `-c <PATH>`.
fn parse_config_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
