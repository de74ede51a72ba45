//! # View Sink
//!
//! The UI side of the editor: it renders what the dispatcher loads and
//! shows a notice after every mutation.

use std::io::Write;

use catalog_core::{CategoryId, Product, TreeRow};
use serde::Serialize;

use crate::error::{ApiError, ErrorCode};

// =============================================================================
// Notice
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// Completion notification for one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
            code: None,
        }
    }

    pub fn failure(err: &ApiError) -> Self {
        Notice {
            level: NoticeLevel::Failure,
            message: err.message.clone(),
            code: Some(err.code),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.level == NoticeLevel::Failure
    }
}

// =============================================================================
// ViewSink
// =============================================================================

/// Receives view refreshes and notices from the dispatcher.
pub trait ViewSink {
    /// Replaces the whole category tree.
    fn render_tree(&mut self, rows: &[TreeRow]);

    /// Replaces the product list of one category.
    fn render_products(&mut self, category_id: CategoryId, products: &[Product]);

    fn notify(&mut self, notice: Notice);
}

// =============================================================================
// JSON Lines Sink
// =============================================================================

/// One line of output.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum ViewEvent<'a> {
    Tree {
        rows: &'a [TreeRow],
    },
    #[serde(rename_all = "camelCase")]
    Products {
        category_id: CategoryId,
        products: &'a [Product],
    },
    Notice {
        #[serde(flatten)]
        notice: &'a Notice,
    },
}

/// Writes every event as one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        JsonLinesSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &ViewEvent<'_>) {
        let written = serde_json::to_string(event)
            .map_err(|e| e.to_string())
            .and_then(|line| {
                writeln!(self.out, "{}", line)
                    .and_then(|_| self.out.flush())
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = written {
            tracing::error!(error = %e, "Failed to write view event");
        }
    }
}

impl<W: Write> ViewSink for JsonLinesSink<W> {
    fn render_tree(&mut self, rows: &[TreeRow]) {
        self.emit(&ViewEvent::Tree { rows });
    }

    fn render_products(&mut self, category_id: CategoryId, products: &[Product]) {
        self.emit(&ViewEvent::Products {
            category_id,
            products,
        });
    }

    fn notify(&mut self, notice: Notice) {
        self.emit(&ViewEvent::Notice { notice: &notice });
    }
}
