//! # Hierarchy Module
//!
//! Parent/child relationships between categories.
//!
//! Everything here works on an adjacency list built once from a full
//! category listing. Walks use an explicit worklist so pathological depths
//! never touch the call stack.
//!
//! ## Cascade Closure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    delete(Fruits)                                       │
//! │                                                                         │
//! │  Fruits ─┬─ Citrus ─── Lemons        worklist: [Fruits]                │
//! │          └─ Berries                   pop Fruits  → push Citrus, Berries│
//! │  Legumes                              pop Berries → (leaf)              │
//! │                                       pop Citrus  → push Lemons         │
//! │                                       pop Lemons  → (leaf)              │
//! │                                                                         │
//! │  closure = {Fruits, Citrus, Berries, Lemons}                           │
//! │  products = every product whose category_id ∈ closure                  │
//! │  Legumes and its products are untouched                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::types::{Category, CategoryId, Product, ProductId};

// =============================================================================
// Child Index
// =============================================================================

/// Adjacency list over a category listing.
#[derive(Debug, Clone, Default)]
pub struct ChildIndex {
    children: HashMap<Option<CategoryId>, Vec<CategoryId>>,
    parents: HashMap<CategoryId, Option<CategoryId>>,
}

impl ChildIndex {
    /// Builds the index. Children are kept in sibling order.
    pub fn build(categories: &[Category]) -> Self {
        let mut sorted: Vec<&Category> = categories.iter().collect();
        sorted.sort_by_key(|c| (c.order, c.id));

        let mut index = ChildIndex::default();
        for category in sorted {
            index
                .children
                .entry(category.parent_id)
                .or_default()
                .push(category.id);
            index.parents.insert(category.id, category.parent_id);
        }
        index
    }

    /// True if the category is in the listing.
    pub fn contains(&self, id: CategoryId) -> bool {
        self.parents.contains_key(&id)
    }

    /// Number of categories indexed.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Parent of `id`. `None` when `id` is unknown, `Some(None)` for roots.
    pub fn parent_of(&self, id: CategoryId) -> Option<Option<CategoryId>> {
        self.parents.get(&id).copied()
    }

    /// Direct children of `parent` in sibling order.
    pub fn children_of(&self, parent: Option<CategoryId>) -> &[CategoryId] {
        self.children
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `root` followed by every descendant, in depth-first order.
    ///
    /// Returns an empty list when `root` is unknown. A visited set guards
    /// against corrupted data that already contains a cycle.
    pub fn closure(&self, root: CategoryId) -> Vec<CategoryId> {
        if !self.contains(root) {
            return Vec::new();
        }

        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut worklist = vec![root];

        while let Some(current) = worklist.pop() {
            if !visited.insert(current) {
                continue;
            }
            result.push(current);
            // Reverse so the first child is popped first
            for child in self.children_of(Some(current)).iter().rev() {
                worklist.push(*child);
            }
        }

        result
    }

    /// Descendants of `root`, excluding `root` itself.
    pub fn descendants(&self, root: CategoryId) -> Vec<CategoryId> {
        self.closure(root).into_iter().skip(1).collect()
    }

    /// Ancestor chain of `id`, nearest first. Stops on unknown ids and on
    /// already-visited nodes.
    pub fn ancestors(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut current = self.parent_of(id).flatten();

        while let Some(parent) = current {
            if !visited.insert(parent) {
                break;
            }
            chain.push(parent);
            current = self.parent_of(parent).flatten();
        }

        chain
    }

    /// Depth of `id` (roots are at depth 0).
    pub fn depth(&self, id: CategoryId) -> usize {
        self.ancestors(id).len()
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: CategoryId, id: CategoryId) -> bool {
        ancestor == id || self.ancestors(id).contains(&ancestor)
    }

    /// Checks that `category_id` may be placed under `new_parent`.
    ///
    /// ## Rules
    /// ```text
    /// category_id unknown                → NotFound
    /// new_parent unknown                 → Reference
    /// new_parent == category_id          → Cycle
    /// new_parent descends from category  → Cycle
    /// new_parent == None (root)          → always allowed
    /// ```
    pub fn check_reparent(
        &self,
        category_id: CategoryId,
        new_parent: Option<CategoryId>,
    ) -> CoreResult<()> {
        if !self.contains(category_id) {
            return Err(CoreError::category_not_found(category_id));
        }

        let Some(parent) = new_parent else {
            return Ok(());
        };

        if !self.contains(parent) {
            return Err(CoreError::missing_category(parent));
        }

        // Walk up from the proposed parent; meeting the moved node means the
        // new parent lives inside the moved subtree.
        if self.is_ancestor_or_self(category_id, parent) {
            return Err(CoreError::Cycle {
                category_id,
                new_parent_id: parent,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Cascade Plan
// =============================================================================

/// Everything a cascade delete removes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadePlan {
    /// The deleted category first, then its descendants.
    pub categories: Vec<CategoryId>,
    /// Products owned by any category in `categories`.
    pub products: Vec<ProductId>,
}

impl CascadePlan {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.products.is_empty()
    }
}

/// Computes the cascade for deleting `root`.
///
/// Fails with `NotFound` if `root` is not in `categories`.
pub fn cascade_plan(
    categories: &[Category],
    products: &[Product],
    root: CategoryId,
) -> CoreResult<CascadePlan> {
    let index = ChildIndex::build(categories);
    if !index.contains(root) {
        return Err(CoreError::category_not_found(root));
    }

    let doomed = index.closure(root);
    let doomed_set: HashSet<CategoryId> = doomed.iter().copied().collect();

    let products = products
        .iter()
        .filter(|p| doomed_set.contains(&p.category_id))
        .map(|p| p.id)
        .collect();

    Ok(CascadePlan {
        categories: doomed,
        products,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
