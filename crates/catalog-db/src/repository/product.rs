//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Append into a category, edit, delete
//! - Reorder within a category
//! - Move between categories, paste a copy
//!
//! ## Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  delete(Berries)                    category "Fruits"                   │
//! │                                                                         │
//! │  Apples   0                         Apples   0                          │
//! │  Berries  1   ── DELETE ──►         Cherries 1                          │
//! │  Cherries 2                                                             │
//! │                                                                         │
//! │  DELETE and renumber commit together; both the product list and the    │
//! │  category tree are refreshed afterwards.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use catalog_core::ordering::close_gaps;
use catalog_core::validation::{validate_ordering, validate_product_fields};
use catalog_core::{positions_for, CategoryId, Product, ProductId};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use super::category::ensure_category;
use super::sequence::{apply_assignments, Table};
use super::{begin, commit};
use crate::error::{DbError, DbResult};

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, label, description, category_id, sort_order, created, modified";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let lemon = repo.add("Lemon", "Sour citrus", citrus.id).await?;
/// let listing = repo.list_by_category(citrus.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Adds a product at the end of `category_id`'s list.
    ///
    /// ## Errors
    /// - `Validation` on an empty label or description
    /// - `Reference` when the category does not exist
    pub async fn add(
        &self,
        label: &str,
        description: &str,
        category_id: CategoryId,
    ) -> DbResult<Product> {
        let (label, description) = validate_product_fields(label, description)?;

        debug!(label = %label, category_id = category_id, "Adding product");

        let mut tx = begin(&self.pool).await?;
        ensure_category(&mut tx, category_id).await?;
        let product = insert_appended(&mut tx, &label, &description, category_id).await?;
        commit(tx).await?;

        Ok(product)
    }

    /// Gets a product by its id.
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    /// Products of one category, in list order. Never returns products of
    /// another category.
    pub async fn list_by_category(&self, category_id: CategoryId) -> DbResult<Vec<Product>> {
        let mut conn = self.pool.acquire().await?;
        let products = in_category(&mut conn, category_id).await?;

        debug!(category_id = category_id, count = products.len(), "Listed products");
        Ok(products)
    }

    /// Every product, sorted by order then id.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products ORDER BY sort_order, id",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Replaces label and description. Both are validated first.
    pub async fn edit(&self, id: ProductId, label: &str, description: &str) -> DbResult<Product> {
        let (label, description) = validate_product_fields(label, description)?;

        debug!(id = id, label = %label, "Editing product");

        let sql = format!(
            "UPDATE products SET label = ?2, description = ?3, modified = ?4 WHERE id = ?1 RETURNING {}",
            PRODUCT_COLUMNS
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&label)
            .bind(&description)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::product_not_found(id))
    }

    /// Deletes a product and renumbers what is left of its category.
    ///
    /// Returns the deleted record so callers know which list to refresh.
    pub async fn delete(&self, id: ProductId) -> DbResult<Product> {
        debug!(id = id, "Deleting product");

        let mut tx = begin(&self.pool).await?;
        let sql = format!("DELETE FROM products WHERE id = ?1 RETURNING {}", PRODUCT_COLUMNS);
        let deleted = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::product_not_found(id))?;

        let remaining = in_category(&mut tx, deleted.category_id).await?;
        apply_assignments(&mut tx, Table::Products, &close_gaps(&remaining)).await?;
        commit(tx).await?;

        Ok(deleted)
    }

    /// Assigns each product of `category_id` its index in `ordered`.
    ///
    /// `ordered` must list every product of the category exactly once.
    /// Returns the number of rows whose order changed.
    pub async fn recalculate_order(
        &self,
        category_id: CategoryId,
        ordered: &[ProductId],
    ) -> DbResult<u64> {
        debug!(category_id = category_id, count = ordered.len(), "Recalculating product order");

        let mut tx = begin(&self.pool).await?;
        let group: Vec<ProductId> = in_category(&mut tx, category_id)
            .await?
            .iter()
            .map(|p| p.id)
            .collect();
        if let Err(err) = validate_ordering(ordered, &group) {
            warn!(category_id = category_id, error = %err, "Product ordering rejected");
            return Err(err.into());
        }

        let changed = apply_assignments(&mut tx, Table::Products, &positions_for(ordered)).await?;
        commit(tx).await?;

        Ok(changed)
    }

    /// Renumbers every category's product list to `0..n-1`.
    pub async fn normalize_order(&self) -> DbResult<u64> {
        let mut tx = begin(&self.pool).await?;
        let sql = format!("SELECT {} FROM products", PRODUCT_COLUMNS);
        let all = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&mut *tx)
            .await?;

        let changed = apply_assignments(&mut tx, Table::Products, &close_gaps(&all)).await?;
        commit(tx).await?;

        Ok(changed)
    }

    /// Sets the owning category without touching any order.
    pub async fn update_category(
        &self,
        id: ProductId,
        new_category: CategoryId,
    ) -> DbResult<Product> {
        debug!(id = id, new_category = new_category, "Updating product category");

        let mut tx = begin(&self.pool).await?;
        ensure_category(&mut tx, new_category).await?;

        let sql = format!(
            "UPDATE products SET category_id = ?2, modified = ?3 WHERE id = ?1 RETURNING {}",
            PRODUCT_COLUMNS
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(new_category)
            .bind(Utc::now())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::product_not_found(id))?;
        commit(tx).await?;

        Ok(product)
    }

    /// Moves a product to the end of `new_category` and closes the gap in
    /// its old category, in one transaction.
    pub async fn move_to(&self, id: ProductId, new_category: CategoryId) -> DbResult<Product> {
        debug!(id = id, new_category = new_category, "Moving product");

        let mut tx = begin(&self.pool).await?;
        let current = fetch(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::product_not_found(id))?;
        if current.category_id == new_category {
            commit(tx).await?;
            return Ok(current);
        }
        ensure_category(&mut tx, new_category).await?;

        let sql = format!(
            r#"
            UPDATE products
            SET category_id = ?2,
                sort_order = (SELECT COUNT(*) FROM products WHERE category_id = ?2),
                modified = ?3
            WHERE id = ?1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );
        let moved = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(new_category)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        let left_behind = in_category(&mut tx, current.category_id).await?;
        apply_assignments(&mut tx, Table::Products, &close_gaps(&left_behind)).await?;
        commit(tx).await?;

        Ok(moved)
    }
}

async fn fetch(conn: &mut SqliteConnection, id: ProductId) -> DbResult<Option<Product>> {
    let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(product)
}

async fn in_category(
    conn: &mut SqliteConnection,
    category_id: CategoryId,
) -> DbResult<Vec<Product>> {
    let sql = format!(
        "SELECT {} FROM products WHERE category_id = ?1 ORDER BY sort_order, id",
        PRODUCT_COLUMNS
    );
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(category_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(products)
}

async fn insert_appended(
    conn: &mut SqliteConnection,
    label: &str,
    description: &str,
    category_id: CategoryId,
) -> DbResult<Product> {
    let sql = format!(
        r#"
        INSERT INTO products (label, description, category_id, sort_order, created, modified)
        SELECT ?1, ?2, ?3, COUNT(*), ?4, ?4 FROM products WHERE category_id = ?3
        RETURNING {}
        "#,
        PRODUCT_COLUMNS
    );
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(label)
        .bind(description)
        .bind(category_id)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use catalog_core::ordering::is_contiguous;

    async fn db_with_category(label: &str) -> (Database, CategoryId) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db.categories().add(label, None).await.unwrap();
        (db, category.id)
    }

    fn shape(products: &[Product]) -> Vec<(&str, i64)> {
        products
            .iter()
            .map(|p| (p.label.as_str(), p.order))
            .collect()
    }

    #[tokio::test]
    async fn test_add_appends_per_category() {
        let (db, fruits) = db_with_category("Fruits").await;
        let legumes = db.categories().add("Legumes", None).await.unwrap().id;
        let repo = db.products();

        let apple = repo.add("Apple", "Red", fruits).await.unwrap();
        let pear = repo.add("Pear", "Green", fruits).await.unwrap();
        let bean = repo.add("Bean", "Broad", legumes).await.unwrap();

        assert_eq!((apple.order, pear.order, bean.order), (0, 1, 0));
        assert_eq!(pear.category_id, fruits);
    }

    #[tokio::test]
    async fn test_add_validates_before_writing() {
        let (db, fruits) = db_with_category("Fruits").await;
        let repo = db.products();

        assert!(matches!(
            repo.add("Apple", "  ", fruits).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            repo.add("", "Red", fruits).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            repo.add("Apple", "Red", 404).await,
            Err(DbError::Reference { id: 404, .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_by_category_only_returns_owned_products() {
        let (db, fruits) = db_with_category("Fruits").await;
        let legumes = db.categories().add("Legumes", None).await.unwrap().id;
        let repo = db.products();

        repo.add("Apple", "Red", fruits).await.unwrap();
        repo.add("Bean", "Broad", legumes).await.unwrap();
        repo.add("Pear", "Green", fruits).await.unwrap();

        let listed = repo.list_by_category(fruits).await.unwrap();
        assert_eq!(shape(&listed), vec![("Apple", 0), ("Pear", 1)]);
        assert!(listed.iter().all(|p| p.category_id == fruits));
        assert!(repo.list_by_category(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit() {
        let (db, fruits) = db_with_category("Fruits").await;
        let repo = db.products();
        let apple = repo.add("Apple", "Red", fruits).await.unwrap();

        let edited = repo.edit(apple.id, "Green apple", "Tart").await.unwrap();
        assert_eq!(edited.label, "Green apple");
        assert_eq!(edited.description, "Tart");
        assert_eq!(edited.order, apple.order);

        assert!(matches!(
            repo.edit(apple.id, "", "Tart").await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            repo.edit(12345, "X", "Y").await,
            Err(DbError::NotFound { .. })
        ));

        let stored = repo.get_by_id(apple.id).await.unwrap().unwrap();
        assert_eq!(stored.label, "Green apple");
    }

    #[tokio::test]
    async fn test_delete_closes_gap() {
        let (db, fruits) = db_with_category("Fruits").await;
        let repo = db.products();

        repo.add("Apple", "Red", fruits).await.unwrap();
        let berry = repo.add("Berry", "Blue", fruits).await.unwrap();
        repo.add("Cherry", "Dark", fruits).await.unwrap();

        let deleted = repo.delete(berry.id).await.unwrap();
        assert_eq!(deleted.category_id, fruits);

        let listed = repo.list_by_category(fruits).await.unwrap();
        assert_eq!(shape(&listed), vec![("Apple", 0), ("Cherry", 1)]);

        assert!(matches!(
            repo.delete(berry.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_drag_second_above_first_swaps() {
        let (db, fruits) = db_with_category("Fruits").await;
        let repo = db.products();

        let first = repo.add("First", "1", fruits).await.unwrap();
        let second = repo.add("Second", "2", fruits).await.unwrap();

        let changed = repo
            .recalculate_order(fruits, &[second.id, first.id])
            .await
            .unwrap();
        assert_eq!(changed, 2);

        let listed = repo.list_by_category(fruits).await.unwrap();
        assert_eq!(shape(&listed), vec![("Second", 0), ("First", 1)]);

        let again = repo
            .recalculate_order(fruits, &[second.id, first.id])
            .await
            .unwrap();
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn test_recalculate_order_rejects_foreign_ids() {
        let (db, fruits) = db_with_category("Fruits").await;
        let legumes = db.categories().add("Legumes", None).await.unwrap().id;
        let repo = db.products();

        let apple = repo.add("Apple", "Red", fruits).await.unwrap();
        let bean = repo.add("Bean", "Broad", legumes).await.unwrap();

        assert!(matches!(
            repo.recalculate_order(fruits, &[bean.id, apple.id]).await,
            Err(DbError::Validation(_))
        ));
        let stored = repo.get_by_id(bean.id).await.unwrap().unwrap();
        assert_eq!(stored.order, 0);
    }

    #[tokio::test]
    async fn test_move_to_keeps_lists_contiguous() {
        let (db, fruits) = db_with_category("Fruits").await;
        let legumes = db.categories().add("Legumes", None).await.unwrap().id;
        let repo = db.products();

        let apple = repo.add("Apple", "Red", fruits).await.unwrap();
        repo.add("Pear", "Green", fruits).await.unwrap();
        repo.add("Bean", "Broad", legumes).await.unwrap();

        let moved = repo.move_to(apple.id, legumes).await.unwrap();
        assert_eq!(moved.category_id, legumes);
        assert_eq!(moved.order, 1);

        assert!(is_contiguous(&repo.list().await.unwrap()));
        let fruit_list = repo.list_by_category(fruits).await.unwrap();
        assert_eq!(shape(&fruit_list), vec![("Pear", 0)]);

        assert!(matches!(
            repo.move_to(apple.id, 777).await,
            Err(DbError::Reference { id: 777, .. })
        ));
    }

    #[tokio::test]
    async fn test_update_category_does_not_renumber() {
        let (db, fruits) = db_with_category("Fruits").await;
        let legumes = db.categories().add("Legumes", None).await.unwrap().id;
        let repo = db.products();

        repo.add("Apple", "Red", fruits).await.unwrap();
        let pear = repo.add("Pear", "Green", fruits).await.unwrap();

        let moved = repo.update_category(pear.id, legumes).await.unwrap();
        assert_eq!(moved.category_id, legumes);
        assert_eq!(moved.order, 1);

        assert!(!is_contiguous(&repo.list().await.unwrap()));
        assert_eq!(repo.normalize_order().await.unwrap(), 1);
        assert!(is_contiguous(&repo.list().await.unwrap()));
    }
}
