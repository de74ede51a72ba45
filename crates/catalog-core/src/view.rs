//! # View Derivation
//!
//! Turns flat store listings into what the tree and product panes render.
//!
//! ```text
//! getAllCategories (levels intermixed)      flatten()
//! ─────────────────────────────────         ────────────────────
//! Legumes   parent=None  order=1            Fruits        depth 0
//! Citrus    parent=1     order=0     ──►      Citrus      depth 1
//! Fruits    parent=None  order=0                Lemons    depth 2
//! Lemons    parent=3     order=0            Legumes       depth 0
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::hierarchy::ChildIndex;
use crate::types::{Category, CategoryId, Product};

/// One visible line of the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TreeRow {
    pub category: Category,
    /// Nesting level, 0 for top-level categories.
    pub depth: usize,
}

/// Direct children of `parent`, sorted by (order, id).
pub fn children_of(categories: &[Category], parent: Option<CategoryId>) -> Vec<&Category> {
    let mut children: Vec<&Category> = categories
        .iter()
        .filter(|c| c.parent_id == parent)
        .collect();
    children.sort_by_key(|c| (c.order, c.id));
    children
}

/// Depth-first, sibling-ordered rows for the whole tree.
///
/// Categories whose parent is missing from the listing are unreachable and
/// left out.
pub fn flatten(categories: &[Category]) -> Vec<TreeRow> {
    let index = ChildIndex::build(categories);
    let by_id: HashMap<CategoryId, &Category> =
        categories.iter().map(|c| (c.id, c)).collect();

    let mut rows = Vec::with_capacity(categories.len());
    let mut visited = HashSet::new();
    let mut stack: Vec<(CategoryId, usize)> = index
        .children_of(None)
        .iter()
        .rev()
        .map(|id| (*id, 0))
        .collect();

    while let Some((id, depth)) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(category) = by_id.get(&id) {
            rows.push(TreeRow {
                category: (*category).clone(),
                depth,
            });
        }
        for child in index.children_of(Some(id)).iter().rev() {
            stack.push((*child, depth + 1));
        }
    }

    rows
}

/// Products of `category_id`, sorted by (order, id).
pub fn products_of(products: &[Product], category_id: CategoryId) -> Vec<Product> {
    let mut owned: Vec<Product> = products
        .iter()
        .filter(|p| p.category_id == category_id)
        .cloned()
        .collect();
    owned.sort_by_key(|p| (p.order, p.id));
    owned
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cat(id: CategoryId, label: &str, parent_id: Option<CategoryId>, order: i64) -> Category {
        let now = Utc::now();
        Category {
            id,
            label: label.to_string(),
            parent_id,
            order,
            created: now,
            modified: now,
        }
    }

    #[test]
    fn test_flatten_depth_first_in_sibling_order() {
        let categories = vec![
            cat(2, "Legumes", None, 1),
            cat(3, "Citrus", Some(1), 0),
            cat(1, "Fruits", None, 0),
            cat(4, "Lemons", Some(3), 0),
            cat(5, "Berries", Some(1), 1),
        ];

        let flat = flatten(&categories);
        let rows: Vec<(&str, usize)> = flat
            .iter()
            .map(|r| (r.category.label.as_str(), r.depth))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("Fruits", 0),
                ("Citrus", 1),
                ("Lemons", 2),
                ("Berries", 1),
                ("Legumes", 0),
            ]
        );
    }

    #[test]
    fn test_flatten_skips_orphans() {
        let categories = vec![cat(1, "Fruits", None, 0), cat(2, "Orphan", Some(99), 0)];
        let rows = flatten(&categories);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category.id, 1);
    }

    #[test]
    fn test_children_of_filters_by_parent() {
        let categories = vec![
            cat(1, "Fruits", None, 0),
            cat(2, "Citrus", Some(1), 1),
            cat(3, "Berries", Some(1), 0),
        ];
        let ids: Vec<CategoryId> = children_of(&categories, Some(1)).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_products_of_only_returns_owned() {
        let now = Utc::now();
        let product = |id, category_id, order| Product {
            id,
            label: format!("P{}", id),
            description: "d".to_string(),
            category_id,
            order,
            created: now,
            modified: now,
        };
        let products = vec![product(1, 7, 1), product(2, 8, 0), product(3, 7, 0)];
        let ids: Vec<i64> = products_of(&products, 7).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
