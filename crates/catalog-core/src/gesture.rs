//! # Drop Gestures
//!
//! Classifies the end of a drag into the structural change it asks for.
//! Pointer state never reaches this module: the drag collaborator reports
//! which item moved, the container it left, the container it landed in and
//! the ids of the destination container in their new visual order.
//!
//! ## Decision Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  item      from            to                 plan                      │
//! │  ────────  ──────────────  ─────────────────  ───────────────────────   │
//! │  Category  Categories(p)   Categories(p)      ReorderCategories(p)     │
//! │  Category  Categories(p)   Categories(q≠p)    ReparentCategory(q)      │
//! │  Product   Products(c)     Products(c)        ReorderProducts(c)       │
//! │  Product   Products(c)     Products(d≠c)      MoveProduct(d)           │
//! │  anything else                                 InvalidDrop              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A reorder only renumbers. A reparent or move changes ownership and the
//! caller reloads the whole view afterwards.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{CategoryId, ProductId};

// =============================================================================
// Gesture Types
// =============================================================================

/// A sortable list in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum Container {
    /// Children of `parent_id` (`None` for the top level).
    #[serde(rename_all = "camelCase")]
    Categories { parent_id: Option<CategoryId> },
    /// Product list of one category.
    #[serde(rename_all = "camelCase")]
    Products { category_id: CategoryId },
}

/// What was dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
#[ts(export)]
pub enum DraggedItem {
    Category(CategoryId),
    Product(ProductId),
}

/// End of a drag, as reported by the drag collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DropEvent {
    pub item: DraggedItem,
    pub from: Container,
    pub to: Container,
    /// Ids of the destination container after the drop, top to bottom.
    #[serde(default)]
    pub ordered_ids: Vec<i64>,
}

/// The structural change a drop resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export)]
pub enum DropPlan {
    #[serde(rename_all = "camelCase")]
    ReorderCategories {
        parent_id: Option<CategoryId>,
        ordered: Vec<CategoryId>,
    },
    #[serde(rename_all = "camelCase")]
    ReorderProducts {
        category_id: CategoryId,
        ordered: Vec<ProductId>,
    },
    #[serde(rename_all = "camelCase")]
    ReparentCategory {
        id: CategoryId,
        new_parent: Option<CategoryId>,
    },
    #[serde(rename_all = "camelCase")]
    MoveProduct {
        id: ProductId,
        new_category: CategoryId,
    },
}

impl DropPlan {
    /// True when the plan changes ownership and the whole view must reload.
    pub fn needs_full_reload(&self) -> bool {
        matches!(
            self,
            DropPlan::ReparentCategory { .. } | DropPlan::MoveProduct { .. }
        )
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Resolves a drop into a [`DropPlan`].
///
/// ## Errors
/// `InvalidDrop` when the item lands in a container of the other kind, or
/// when a category is dropped into its own list of children.
///
/// ```rust
/// use catalog_core::gesture::{plan_drop, Container, DraggedItem, DropEvent, DropPlan};
///
/// let event = DropEvent {
///     item: DraggedItem::Product(2),
///     from: Container::Products { category_id: 1 },
///     to: Container::Products { category_id: 1 },
///     ordered_ids: vec![2, 1],
/// };
/// assert_eq!(
///     plan_drop(&event).unwrap(),
///     DropPlan::ReorderProducts { category_id: 1, ordered: vec![2, 1] }
/// );
/// ```
pub fn plan_drop(event: &DropEvent) -> CoreResult<DropPlan> {
    match (event.item, event.from, event.to) {
        (
            DraggedItem::Category(id),
            Container::Categories { parent_id: from },
            Container::Categories { parent_id: to },
        ) => {
            if from == to {
                Ok(DropPlan::ReorderCategories {
                    parent_id: to,
                    ordered: event.ordered_ids.clone(),
                })
            } else if to == Some(id) {
                Err(CoreError::InvalidDrop(format!(
                    "category {} dropped into its own children",
                    id
                )))
            } else {
                Ok(DropPlan::ReparentCategory { id, new_parent: to })
            }
        }
        (
            DraggedItem::Product(id),
            Container::Products { category_id: from },
            Container::Products { category_id: to },
        ) => {
            if from == to {
                Ok(DropPlan::ReorderProducts {
                    category_id: to,
                    ordered: event.ordered_ids.clone(),
                })
            } else {
                Ok(DropPlan::MoveProduct {
                    id,
                    new_category: to,
                })
            }
        }
        (DraggedItem::Category(id), _, _) => Err(CoreError::InvalidDrop(format!(
            "category {} must stay in a category list",
            id
        ))),
        (DraggedItem::Product(id), _, _) => Err(CoreError::InvalidDrop(format!(
            "product {} must stay in a product list",
            id
        ))),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(parent_id: Option<CategoryId>) -> Container {
        Container::Categories { parent_id }
    }

    fn products(category_id: CategoryId) -> Container {
        Container::Products { category_id }
    }

    #[test]
    fn test_same_container_reorders() {
        let event = DropEvent {
            item: DraggedItem::Category(3),
            from: categories(None),
            to: categories(None),
            ordered_ids: vec![3, 1, 2],
        };
        let plan = plan_drop(&event).unwrap();
        assert_eq!(
            plan,
            DropPlan::ReorderCategories {
                parent_id: None,
                ordered: vec![3, 1, 2]
            }
        );
        assert!(!plan.needs_full_reload());
    }

    #[test]
    fn test_cross_container_category_reparents() {
        let event = DropEvent {
            item: DraggedItem::Category(4),
            from: categories(Some(1)),
            to: categories(None),
            ordered_ids: vec![1, 4, 2],
        };
        let plan = plan_drop(&event).unwrap();
        assert_eq!(
            plan,
            DropPlan::ReparentCategory {
                id: 4,
                new_parent: None
            }
        );
        assert!(plan.needs_full_reload());
    }

    #[test]
    fn test_cross_container_product_moves() {
        let event = DropEvent {
            item: DraggedItem::Product(9),
            from: products(1),
            to: products(2),
            ordered_ids: vec![],
        };
        assert_eq!(
            plan_drop(&event).unwrap(),
            DropPlan::MoveProduct {
                id: 9,
                new_category: 2
            }
        );
    }

    #[test]
    fn test_kind_mismatch_is_invalid() {
        let event = DropEvent {
            item: DraggedItem::Category(1),
            from: categories(None),
            to: products(5),
            ordered_ids: vec![],
        };
        assert!(matches!(plan_drop(&event), Err(CoreError::InvalidDrop(_))));

        let event = DropEvent {
            item: DraggedItem::Product(1),
            from: products(5),
            to: categories(Some(5)),
            ordered_ids: vec![],
        };
        assert!(matches!(plan_drop(&event), Err(CoreError::InvalidDrop(_))));
    }

    #[test]
    fn test_category_into_own_children_is_invalid() {
        let event = DropEvent {
            item: DraggedItem::Category(3),
            from: categories(None),
            to: categories(Some(3)),
            ordered_ids: vec![3],
        };
        assert!(matches!(plan_drop(&event), Err(CoreError::InvalidDrop(_))));
    }

    #[test]
    fn test_drop_event_wire_format() {
        let json = r#"{
            "item": { "kind": "product", "id": 7 },
            "from": { "kind": "products", "categoryId": 1 },
            "to": { "kind": "products", "categoryId": 1 },
            "orderedIds": [7, 6]
        }"#;
        let event: DropEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.item, DraggedItem::Product(7));
        assert_eq!(event.ordered_ids, vec![7, 6]);
    }
}
