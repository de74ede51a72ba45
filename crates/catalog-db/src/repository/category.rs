//! # Category Repository
//!
//! Database operations for the category tree.
//!
//! ## Cascade Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    delete_cascade(Fruits)                               │
//! │                                                                         │
//! │  Transaction 1                                                         │
//! │  ├── load all categories + all products                                │
//! │  ├── cascade_plan() → closure {Fruits, Citrus, Lemons} + products      │
//! │  ├── DELETE products in plan                                           │
//! │  ├── DELETE categories in plan                                         │
//! │  └── COMMIT (deferred FK check runs here)                              │
//! │                                                                         │
//! │  Transaction 2                                                         │
//! │  └── normalize_order() → survivors renumbered per sibling group       │
//! │                                                                         │
//! │  A crash between 1 and 2 leaves gaps; the next normalize heals them.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Appending
//! New categories take `order = number of siblings`. The count and the
//! insert are one `INSERT … SELECT COUNT(*) … RETURNING` statement, so two
//! concurrent adds can never read the same count.

use std::collections::HashMap;

use catalog_core::hierarchy::{cascade_plan, ChildIndex};
use catalog_core::ordering::close_gaps;
use catalog_core::validation::{validate_label, validate_ordering};
use catalog_core::view::{flatten, TreeRow};
use catalog_core::{positions_for, Category, CategoryId, Product, ProductId};
use chrono::Utc;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::sequence::{apply_assignments, Table};
use super::{begin, commit};
use crate::error::{DbError, DbResult};

const CATEGORY_COLUMNS: &str = "id, label, parent_id, sort_order, created, modified";

/// What a cascade delete removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    /// The deleted category first, then its descendants.
    pub categories: Vec<CategoryId>,
    pub products: Vec<ProductId>,
    /// Surviving categories whose order changed in the renumber pass.
    pub renumbered: u64,
}

/// Repository for category database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CategoryRepository::new(pool);
///
/// let fruits = repo.add("Fruits", None).await?;
/// let citrus = repo.add("Citrus", Some(fruits.id)).await?;
/// repo.delete_cascade(fruits.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Adds a category at the end of `parent_id`'s children.
    ///
    /// ## Errors
    /// - `Validation` if the label is empty
    /// - `Reference` if `parent_id` names a missing category
    pub async fn add(&self, label: &str, parent_id: Option<CategoryId>) -> DbResult<Category> {
        let label = validate_label("label", label)?;

        debug!(label = %label, parent_id = ?parent_id, "Adding category");

        let mut tx = begin(&self.pool).await?;
        if let Some(parent) = parent_id {
            ensure_category(&mut tx, parent).await?;
        }
        let category = insert_appended(&mut tx, &label, parent_id).await?;
        commit(tx).await?;

        debug!(id = category.id, order = category.order, "Category added");
        Ok(category)
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Gets a category by id.
    pub async fn get_by_id(&self, id: CategoryId) -> DbResult<Option<Category>> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    /// All categories, levels intermixed, sorted by order then id.
    ///
    /// Consumers filter by `parent_id`, or use [`Self::tree`].
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let mut conn = self.pool.acquire().await?;
        load_all(&mut conn).await
    }

    /// Direct children of `parent_id`, in sibling order.
    pub async fn children(&self, parent_id: Option<CategoryId>) -> DbResult<Vec<Category>> {
        let sql = format!(
            "SELECT {} FROM categories WHERE parent_id IS ?1 ORDER BY sort_order, id",
            CATEGORY_COLUMNS
        );
        let children = sqlx::query_as::<_, Category>(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(children)
    }

    /// Every descendant of `id` (not `id` itself), depth first.
    pub async fn descendants(&self, id: CategoryId) -> DbResult<Vec<Category>> {
        let all = self.list().await?;
        let index = ChildIndex::build(&all);
        if !index.contains(id) {
            return Err(DbError::category_not_found(id));
        }

        let by_id: HashMap<CategoryId, &Category> = all.iter().map(|c| (c.id, c)).collect();
        let descendants = index
            .descendants(id)
            .iter()
            .filter_map(|d| by_id.get(d).map(|c| (*c).clone()))
            .collect();
        Ok(descendants)
    }

    /// Depth-first rows for rendering the whole tree.
    pub async fn tree(&self) -> DbResult<Vec<TreeRow>> {
        Ok(flatten(&self.list().await?))
    }

    /// Counts categories (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Renames a category. The label is validated before anything is read.
    pub async fn rename(&self, id: CategoryId, label: &str) -> DbResult<Category> {
        let label = validate_label("label", label)?;

        debug!(id = id, label = %label, "Renaming category");

        let sql = format!(
            "UPDATE categories SET label = ?2, modified = ?3 WHERE id = ?1 RETURNING {}",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(&label)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::category_not_found(id))
    }

    /// Sets `parent_id` without touching any order.
    ///
    /// Both the old and the new sibling group may be left with gaps; use
    /// [`Self::move_to`] to keep them contiguous.
    ///
    /// ## Errors
    /// - `NotFound` if `id` is missing
    /// - `Reference` if `new_parent` is missing
    /// - `Cycle` if `new_parent` is `id` or one of its descendants
    pub async fn update_parent(
        &self,
        id: CategoryId,
        new_parent: Option<CategoryId>,
    ) -> DbResult<Category> {
        debug!(id = id, new_parent = ?new_parent, "Updating category parent");

        let mut tx = begin(&self.pool).await?;
        let index = ChildIndex::build(&load_all(&mut tx).await?);
        if let Err(err) = index.check_reparent(id, new_parent) {
            warn!(id = id, new_parent = ?new_parent, error = %err, "Reparent rejected");
            return Err(err.into());
        }

        let sql = format!(
            "UPDATE categories SET parent_id = ?2, modified = ?3 WHERE id = ?1 RETURNING {}",
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(new_parent)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;
        commit(tx).await?;

        Ok(category)
    }

    /// Moves a category to the end of `new_parent`'s children and closes
    /// the gap it leaves behind, in one transaction.
    ///
    /// Moving to the current parent changes nothing.
    pub async fn move_to(
        &self,
        id: CategoryId,
        new_parent: Option<CategoryId>,
    ) -> DbResult<Category> {
        debug!(id = id, new_parent = ?new_parent, "Moving category");

        let mut tx = begin(&self.pool).await?;
        let all = load_all(&mut tx).await?;
        let index = ChildIndex::build(&all);
        if let Err(err) = index.check_reparent(id, new_parent) {
            warn!(id = id, new_parent = ?new_parent, error = %err, "Move rejected");
            return Err(err.into());
        }

        let old_parent = index.parent_of(id).flatten();
        if old_parent == new_parent {
            let current = fetch(&mut tx, id)
                .await?
                .ok_or_else(|| DbError::category_not_found(id))?;
            commit(tx).await?;
            return Ok(current);
        }

        let sql = format!(
            r#"
            UPDATE categories
            SET parent_id = ?2,
                sort_order = (SELECT COUNT(*) FROM categories WHERE parent_id IS ?2),
                modified = ?3
            WHERE id = ?1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        let moved = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(new_parent)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        let left_behind = siblings(&mut tx, old_parent).await?;
        let changed = apply_assignments(&mut tx, Table::Categories, &close_gaps(&left_behind)).await?;
        commit(tx).await?;

        debug!(id = id, order = moved.order, source_renumbered = changed, "Category moved");
        Ok(moved)
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// Assigns each category its index in `ordered`.
    ///
    /// `ordered` must list every member of exactly one sibling group, once.
    /// Returns the number of rows whose order changed; a second call with
    /// the same list returns 0. `modified` is left alone.
    pub async fn recalculate_order(&self, ordered: &[CategoryId]) -> DbResult<u64> {
        let Some(first) = ordered.first() else {
            return Ok(0);
        };

        debug!(count = ordered.len(), "Recalculating category order");

        let mut tx = begin(&self.pool).await?;
        let parent: Option<Option<CategoryId>> =
            sqlx::query_scalar("SELECT parent_id FROM categories WHERE id = ?1")
                .bind(first)
                .fetch_optional(&mut *tx)
                .await?;
        let parent = parent.ok_or_else(|| DbError::category_not_found(*first))?;

        let group: Vec<CategoryId> = siblings(&mut tx, parent)
            .await?
            .iter()
            .map(|c| c.id)
            .collect();
        if let Err(err) = validate_ordering(ordered, &group) {
            warn!(error = %err, "Category ordering rejected");
            return Err(err.into());
        }

        let changed = apply_assignments(&mut tx, Table::Categories, &positions_for(ordered)).await?;
        commit(tx).await?;

        Ok(changed)
    }

    /// Renumbers every sibling group to `0..n-1`, keeping the current
    /// relative order (ties broken by id).
    pub async fn normalize_order(&self) -> DbResult<u64> {
        let mut tx = begin(&self.pool).await?;
        let all = load_all(&mut tx).await?;
        if all.is_empty() {
            commit(tx).await?;
            return Ok(0);
        }

        let changed = apply_assignments(&mut tx, Table::Categories, &close_gaps(&all)).await?;
        commit(tx).await?;

        if changed > 0 {
            debug!(changed = changed, "Category order normalized");
        }
        Ok(changed)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Deletes a category, all of its descendants, and every product they
    /// own. Survivors are then renumbered.
    pub async fn delete_cascade(&self, id: CategoryId) -> DbResult<CascadeReport> {
        info!(id = id, "Deleting category with cascade");

        let mut tx = begin(&self.pool).await?;
        let categories = load_all(&mut tx).await?;
        let product_sql = format!(
            "SELECT {} FROM products ORDER BY sort_order, id",
            super::product::PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&product_sql)
            .fetch_all(&mut *tx)
            .await?;

        let plan = cascade_plan(&categories, &products, id)?;

        for product_id in &plan.products {
            sqlx::query("DELETE FROM products WHERE id = ?1")
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }
        for category_id in &plan.categories {
            sqlx::query("DELETE FROM categories WHERE id = ?1")
                .bind(category_id)
                .execute(&mut *tx)
                .await?;
        }
        commit(tx).await?;

        info!(
            id = id,
            categories = plan.categories.len(),
            products = plan.products.len(),
            "Cascade committed"
        );

        let renumbered = self.normalize_order().await?;

        Ok(CascadeReport {
            categories: plan.categories,
            products: plan.products,
            renumbered,
        })
    }
}

// =============================================================================
// Connection-level helpers
// =============================================================================

async fn fetch(conn: &mut SqliteConnection, id: CategoryId) -> DbResult<Option<Category>> {
    let sql = format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLUMNS);
    let category = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(category)
}

async fn load_all(conn: &mut SqliteConnection) -> DbResult<Vec<Category>> {
    let sql = format!(
        "SELECT {} FROM categories ORDER BY sort_order, id",
        CATEGORY_COLUMNS
    );
    let categories = sqlx::query_as::<_, Category>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    Ok(categories)
}

async fn siblings(
    conn: &mut SqliteConnection,
    parent_id: Option<CategoryId>,
) -> DbResult<Vec<Category>> {
    let sql = format!(
        "SELECT {} FROM categories WHERE parent_id IS ?1 ORDER BY sort_order, id",
        CATEGORY_COLUMNS
    );
    let rows = sqlx::query_as::<_, Category>(&sql)
        .bind(parent_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

async fn insert_appended(
    conn: &mut SqliteConnection,
    label: &str,
    parent_id: Option<CategoryId>,
) -> DbResult<Category> {
    let sql = format!(
        r#"
        INSERT INTO categories (label, parent_id, sort_order, created, modified)
        SELECT ?1, ?2, COUNT(*), ?3, ?3 FROM categories WHERE parent_id IS ?2
        RETURNING {}
        "#,
        CATEGORY_COLUMNS
    );
    let category = sqlx::query_as::<_, Category>(&sql)
        .bind(label)
        .bind(parent_id)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;
    Ok(category)
}

/// Fails with `Reference` unless category `id` exists.
pub(crate) async fn ensure_category(conn: &mut SqliteConnection, id: CategoryId) -> DbResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => {
            warn!(id = id, "Referenced category does not exist");
            Err(DbError::missing_category(id))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use catalog_core::ordering::is_contiguous;
    use catalog_core::ValidationError;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn labels(categories: &[Category]) -> Vec<(&str, i64)> {
        categories
            .iter()
            .map(|c| (c.label.as_str(), c.order))
            .collect()
    }

    #[tokio::test]
    async fn test_add_appends_at_sibling_count() {
        let db = db().await;
        let repo = db.categories();

        let fruits = repo.add("Fruits", None).await.unwrap();
        let legumes = repo.add("Legumes", None).await.unwrap();
        let citrus = repo.add("Citrus", Some(fruits.id)).await.unwrap();
        let berries = repo.add("  Berries ", Some(fruits.id)).await.unwrap();

        assert_eq!(fruits.order, 0);
        assert_eq!(legumes.order, 1);
        assert_eq!(citrus.order, 0);
        assert_eq!(berries.order, 1);
        assert_eq!(berries.label, "Berries");
        assert_eq!(berries.parent_id, Some(fruits.id));
        assert_eq!(fruits.created, fruits.modified);
    }

    #[tokio::test]
    async fn test_add_rejects_missing_parent_and_empty_label() {
        let db = db().await;
        let repo = db.categories();

        let err = repo.add("Orphan", Some(42)).await.unwrap_err();
        assert!(matches!(err, DbError::Reference { id: 42, .. }));

        let err = repo.add("   ", None).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::Required { .. })));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_and_children_sorted_by_order() {
        let db = db().await;
        let repo = db.categories();

        let a = repo.add("A", None).await.unwrap();
        let b = repo.add("B", None).await.unwrap();
        repo.add("A1", Some(a.id)).await.unwrap();
        repo.recalculate_order(&[b.id, a.id]).await.unwrap();

        let roots = repo.children(None).await.unwrap();
        assert_eq!(labels(&roots), vec![("B", 0), ("A", 1)]);

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].order <= w[1].order));
    }

    #[tokio::test]
    async fn test_rename() {
        let db = db().await;
        let repo = db.categories();
        let fruits = repo.add("Fruits", None).await.unwrap();

        let renamed = repo.rename(fruits.id, "Fresh fruit").await.unwrap();
        assert_eq!(renamed.label, "Fresh fruit");
        assert!(renamed.modified >= fruits.modified);

        let err = repo.rename(999, "Ghost").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 999, .. }));
    }

    #[tokio::test]
    async fn test_rename_with_empty_label_keeps_old_label() {
        let db = db().await;
        let repo = db.categories();
        let fruits = repo.add("Fruits", None).await.unwrap();

        let err = repo.rename(fruits.id, "").await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let stored = repo.get_by_id(fruits.id).await.unwrap().unwrap();
        assert_eq!(stored.label, "Fruits");
        assert_eq!(stored.modified, fruits.modified);
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_subtree_and_products() {
        let db = db().await;
        let repo = db.categories();

        let fruits = repo.add("Fruits", None).await.unwrap();
        let legumes = repo.add("Legumes", None).await.unwrap();
        let citrus = repo.add("Citrus", Some(fruits.id)).await.unwrap();
        let lemon = repo.add("Lemon", Some(citrus.id)).await.unwrap();

        let products = db.products();
        let kept = products.add("Lentils", "Green", legumes.id).await.unwrap();
        let gone_a = products.add("Apple", "Red", fruits.id).await.unwrap();
        let gone_b = products.add("Meyer", "Sweet", lemon.id).await.unwrap();

        let report = repo.delete_cascade(fruits.id).await.unwrap();

        assert_eq!(report.categories, vec![fruits.id, citrus.id, lemon.id]);
        let mut deleted_products = report.products.clone();
        deleted_products.sort();
        assert_eq!(deleted_products, vec![gone_a.id, gone_b.id]);
        assert_eq!(report.renumbered, 1);

        let remaining = repo.list().await.unwrap();
        assert_eq!(labels(&remaining), vec![("Legumes", 0)]);

        let survivors = products.list().await.unwrap();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_delete_middle_sibling_closes_gap() {
        let db = db().await;
        let repo = db.categories();

        repo.add("A", None).await.unwrap();
        let b = repo.add("B", None).await.unwrap();
        repo.add("C", None).await.unwrap();

        repo.delete_cascade(b.id).await.unwrap();

        let roots = repo.children(None).await.unwrap();
        assert_eq!(labels(&roots), vec![("A", 0), ("C", 1)]);
    }

    #[tokio::test]
    async fn test_delete_last_category() {
        let db = db().await;
        let repo = db.categories();
        let only = repo.add("Only", None).await.unwrap();

        let report = repo.delete_cascade(only.id).await.unwrap();
        assert_eq!(report.renumbered, 0);
        assert_eq!(repo.count().await.unwrap(), 0);

        let err = repo.delete_cascade(only.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_recalculate_order_is_idempotent() {
        let db = db().await;
        let repo = db.categories();

        let a = repo.add("A", None).await.unwrap();
        let b = repo.add("B", None).await.unwrap();
        let c = repo.add("C", None).await.unwrap();

        let first = repo.recalculate_order(&[c.id, a.id, b.id]).await.unwrap();
        assert_eq!(first, 3);
        let second = repo.recalculate_order(&[c.id, a.id, b.id]).await.unwrap();
        assert_eq!(second, 0);

        let roots = repo.children(None).await.unwrap();
        assert_eq!(labels(&roots), vec![("C", 0), ("A", 1), ("B", 2)]);
        assert_eq!(repo.recalculate_order(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recalculate_order_rejects_partial_or_mixed_groups() {
        let db = db().await;
        let repo = db.categories();

        let a = repo.add("A", None).await.unwrap();
        let b = repo.add("B", None).await.unwrap();
        let child = repo.add("A1", Some(a.id)).await.unwrap();

        assert!(matches!(
            repo.recalculate_order(&[b.id]).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            repo.recalculate_order(&[b.id, a.id, child.id]).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            repo.recalculate_order(&[b.id, b.id]).await,
            Err(DbError::Validation(ValidationError::Duplicate { .. }))
        ));
        assert!(matches!(
            repo.recalculate_order(&[77]).await,
            Err(DbError::NotFound { id: 77, .. })
        ));

        let roots = repo.children(None).await.unwrap();
        assert_eq!(labels(&roots), vec![("A", 0), ("B", 1)]);
    }

    #[tokio::test]
    async fn test_update_parent_rejects_cycles() {
        let db = db().await;
        let repo = db.categories();

        let fruits = repo.add("Fruits", None).await.unwrap();
        let citrus = repo.add("Citrus", Some(fruits.id)).await.unwrap();
        let lemon = repo.add("Lemon", Some(citrus.id)).await.unwrap();

        assert!(matches!(
            repo.update_parent(fruits.id, Some(lemon.id)).await,
            Err(DbError::Cycle { .. })
        ));
        assert!(matches!(
            repo.update_parent(citrus.id, Some(citrus.id)).await,
            Err(DbError::Cycle { .. })
        ));
        assert!(matches!(
            repo.update_parent(citrus.id, Some(500)).await,
            Err(DbError::Reference { id: 500, .. })
        ));

        let stored = repo.get_by_id(fruits.id).await.unwrap().unwrap();
        assert_eq!(stored.parent_id, None);
    }

    #[tokio::test]
    async fn test_update_parent_keeps_order() {
        let db = db().await;
        let repo = db.categories();

        let fruits = repo.add("Fruits", None).await.unwrap();
        repo.add("Legumes", None).await.unwrap();
        let citrus = repo.add("Citrus", Some(fruits.id)).await.unwrap();

        let moved = repo.update_parent(citrus.id, None).await.unwrap();
        assert_eq!(moved.parent_id, None);
        assert_eq!(moved.order, 0);
        assert!(moved.modified >= citrus.modified);
    }

    #[tokio::test]
    async fn test_move_to_keeps_both_groups_contiguous() {
        let db = db().await;
        let repo = db.categories();

        let fruits = repo.add("Fruits", None).await.unwrap();
        let legumes = repo.add("Legumes", None).await.unwrap();
        repo.add("Apples", Some(fruits.id)).await.unwrap();
        let citrus = repo.add("Citrus", Some(fruits.id)).await.unwrap();
        repo.add("Grapes", Some(fruits.id)).await.unwrap();
        repo.add("Beans", Some(legumes.id)).await.unwrap();

        let moved = repo.move_to(citrus.id, Some(legumes.id)).await.unwrap();
        assert_eq!(moved.parent_id, Some(legumes.id));
        assert_eq!(moved.order, 1);

        let all = repo.list().await.unwrap();
        assert!(is_contiguous(&all));
        let fruit_children = repo.children(Some(fruits.id)).await.unwrap();
        assert_eq!(labels(&fruit_children), vec![("Apples", 0), ("Grapes", 1)]);
    }

    #[tokio::test]
    async fn test_move_to_same_parent_is_noop() {
        let db = db().await;
        let repo = db.categories();
        repo.add("A", None).await.unwrap();
        let b = repo.add("B", None).await.unwrap();

        let same = repo.move_to(b.id, None).await.unwrap();
        assert_eq!(same, b);
    }

    #[tokio::test]
    async fn test_descendants_and_tree() {
        let db = db().await;
        let repo = db.categories();

        let fruits = repo.add("Fruits", None).await.unwrap();
        let citrus = repo.add("Citrus", Some(fruits.id)).await.unwrap();
        let lemon = repo.add("Lemon", Some(citrus.id)).await.unwrap();
        repo.add("Legumes", None).await.unwrap();

        let ids: Vec<CategoryId> = repo
            .descendants(fruits.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![citrus.id, lemon.id]);

        let rows = repo.tree().await.unwrap();
        let shape: Vec<(&str, usize)> = rows
            .iter()
            .map(|r| (r.category.label.as_str(), r.depth))
            .collect();
        assert_eq!(
            shape,
            vec![("Fruits", 0), ("Citrus", 1), ("Lemon", 2), ("Legumes", 0)]
        );
    }

    #[tokio::test]
    async fn test_descendants_of_wide_subtree() {
        let db = db().await;
        let repo = db.categories();

        let root = repo.add("Root", None).await.unwrap();
        let mut expected = Vec::new();
        for i in 0..300 {
            let child = repo.add(&format!("Child {}", i), Some(root.id)).await.unwrap();
            let leaf = repo.add(&format!("Leaf {}", i), Some(child.id)).await.unwrap();
            expected.push(child.id);
            expected.push(leaf.id);
        }
        repo.add("Elsewhere", None).await.unwrap();

        let ids: Vec<CategoryId> = repo
            .descendants(root.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_normalize_order_heals_gaps() {
        let db = db().await;
        let repo = db.categories();

        let a = repo.add("A", None).await.unwrap();
        repo.add("B", None).await.unwrap();
        let x = repo.add("X", Some(a.id)).await.unwrap();

        // Raw reparent leaves X at order 0 next to A
        repo.update_parent(x.id, None).await.unwrap();
        assert!(!is_contiguous(&repo.list().await.unwrap()));

        assert!(repo.normalize_order().await.unwrap() > 0);
        assert!(is_contiguous(&repo.list().await.unwrap()));
        assert_eq!(repo.normalize_order().await.unwrap(), 0);
    }

    #[test]
    fn test_cascade_report_serializes_camel_case() {
        let report = CascadeReport {
            categories: vec![1, 3],
            products: vec![7],
            renumbered: 1,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["categories"], serde_json::json!([1, 3]));
        assert_eq!(json["products"], serde_json::json!([7]));
        assert_eq!(json["renumbered"], 1);
    }
}
