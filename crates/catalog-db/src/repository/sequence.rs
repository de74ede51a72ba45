//! Sibling order writes shared by both repositories.
//!
//! These helpers never open a transaction themselves; the caller owns it so
//! a renumber always commits together with the change that caused it.

use catalog_core::OrderAssignment;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;

/// A table holding a `sort_order` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Table {
    Categories,
    Products,
}

impl Table {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::Products => "products",
        }
    }
}

/// Writes `assignments`, skipping rows that already hold the value.
///
/// Returns the number of rows actually changed, so applying the same
/// assignments twice reports zero the second time.
pub(crate) async fn apply_assignments(
    conn: &mut SqliteConnection,
    table: Table,
    assignments: &[OrderAssignment],
) -> DbResult<u64> {
    if assignments.is_empty() {
        return Ok(0);
    }

    let sql = format!(
        "UPDATE {} SET sort_order = ?1 WHERE id = ?2 AND sort_order <> ?1",
        table.name()
    );

    let mut changed = 0;
    for assignment in assignments {
        let result = sqlx::query(&sql)
            .bind(assignment.order)
            .bind(assignment.id)
            .execute(&mut *conn)
            .await?;
        changed += result.rows_affected();
    }

    debug!(
        table = table.name(),
        requested = assignments.len(),
        changed = changed,
        "Applied sibling order"
    );

    Ok(changed)
}
