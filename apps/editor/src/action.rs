//! # Editor Actions
//!
//! Every UI event becomes one [`Action`]; [`CatalogEditor::dispatch`]
//! is the only place that executes them.
//!
//! ## Wire Format
//! Actions arrive as JSON tagged by `type`:
//! ```json
//! { "type": "addCategory", "label": "Citrus", "parentId": 1 }
//! { "type": "renameCategory", "id": 2, "label": "Lemons & Limes" }
//! { "type": "drop", "item": { "kind": "product", "id": 7 },
//!   "from": { "kind": "products", "categoryId": 1 },
//!   "to": { "kind": "products", "categoryId": 1 },
//!   "orderedIds": [7, 6] }
//! ```
//!
//! [`CatalogEditor::dispatch`]: crate::handler::CatalogEditor::dispatch

use catalog_core::{Category, CategoryId, DropEvent, Product, ProductId, TreeRow};
use catalog_db::CascadeReport;
use serde::{Deserialize, Serialize};

// =============================================================================
// Action
// =============================================================================

/// A user intent, fully resolved to ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Re-read the category tree.
    LoadCategories,

    /// Re-read one category's product list.
    #[serde(rename_all = "camelCase")]
    LoadProducts { category_id: CategoryId },

    /// Add a top-level category (`parent_id: None`) or a sub-category.
    #[serde(rename_all = "camelCase")]
    AddCategory {
        label: String,
        #[serde(default)]
        parent_id: Option<CategoryId>,
    },

    RenameCategory { id: CategoryId, label: String },

    /// Delete a category with its whole subtree and their products.
    DeleteCategory { id: CategoryId },

    #[serde(rename_all = "camelCase")]
    AddProduct {
        label: String,
        description: String,
        category_id: CategoryId,
    },

    EditProduct {
        id: ProductId,
        label: String,
        description: String,
    },

    DeleteProduct { id: ProductId },

    /// End of a drag gesture.
    Drop(DropEvent),

    /// Paste the copied category as the last child of `target_parent`.
    /// `label` is the label at copy time; the copy gets a suffix.
    #[serde(rename_all = "camelCase")]
    PasteCategory {
        label: String,
        #[serde(default)]
        target_parent: Option<CategoryId>,
    },

    /// Paste the copied product at the end of `target_category`.
    #[serde(rename_all = "camelCase")]
    PasteProduct {
        label: String,
        description: String,
        target_category: CategoryId,
    },

    /// Repair gaps in every sibling group.
    NormalizeOrder,
}

impl Action {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::LoadCategories => "load_categories",
            Action::LoadProducts { .. } => "load_products",
            Action::AddCategory { .. } => "add_category",
            Action::RenameCategory { .. } => "rename_category",
            Action::DeleteCategory { .. } => "delete_category",
            Action::AddProduct { .. } => "add_product",
            Action::EditProduct { .. } => "edit_product",
            Action::DeleteProduct { .. } => "delete_product",
            Action::Drop(_) => "drop",
            Action::PasteCategory { .. } => "paste_category",
            Action::PasteProduct { .. } => "paste_product",
            Action::NormalizeOrder => "normalize_order",
        }
    }

    /// True for actions that write to the store.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Action::LoadCategories | Action::LoadProducts { .. }
        )
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// What a successful action produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Outcome {
    Tree(Vec<TreeRow>),
    #[serde(rename_all = "camelCase")]
    Products {
        category_id: CategoryId,
        products: Vec<Product>,
    },
    Category(Category),
    Product(Product),
    CategoryDeleted(CascadeReport),
    ProductDeleted(Product),
    /// Reorder or normalize; number of rows whose order changed.
    Renumbered(u64),
}

impl Outcome {
    /// Message shown in the completion notice of a mutation.
    pub fn summary(&self) -> String {
        match self {
            Outcome::Tree(rows) => format!("{} categories", rows.len()),
            Outcome::Products { products, .. } => format!("{} products", products.len()),
            Outcome::Category(c) => format!("Category \"{}\" saved", c.label),
            Outcome::Product(p) => format!("Product \"{}\" saved", p.label),
            Outcome::CategoryDeleted(report) => format!(
                "Deleted {} categories and {} products",
                report.categories.len(),
                report.products.len()
            ),
            Outcome::ProductDeleted(p) => format!("Product \"{}\" deleted", p.label),
            Outcome::Renumbered(changed) => format!("Order updated ({} changed)", changed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{Container, DraggedItem};

    #[test]
    fn test_parse_add_category() {
        let action: Action =
            serde_json::from_str(r#"{"type":"addCategory","label":"Citrus","parentId":1}"#)
                .unwrap();
        assert_eq!(
            action,
            Action::AddCategory {
                label: "Citrus".into(),
                parent_id: Some(1)
            }
        );

        let top: Action = serde_json::from_str(r#"{"type":"addCategory","label":"Herbs"}"#)
            .unwrap();
        assert_eq!(
            top,
            Action::AddCategory {
                label: "Herbs".into(),
                parent_id: None
            }
        );
    }

    #[test]
    fn test_parse_drop() {
        let json = r#"{
            "type": "drop",
            "item": {"kind": "product", "id": 7},
            "from": {"kind": "products", "categoryId": 1},
            "to": {"kind": "products", "categoryId": 1},
            "orderedIds": [7, 6]
        }"#;
        let action: Action = serde_json::from_str(json).unwrap();

        assert_eq!(
            action,
            Action::Drop(DropEvent {
                item: DraggedItem::Product(7),
                from: Container::Products { category_id: 1 },
                to: Container::Products { category_id: 1 },
                ordered_ids: vec![7, 6],
            })
        );
        assert!(action.is_mutation());
    }

    #[test]
    fn test_loads_are_not_mutations() {
        assert!(!Action::LoadCategories.is_mutation());
        assert!(!Action::LoadProducts { category_id: 1 }.is_mutation());
        assert!(Action::NormalizeOrder.is_mutation());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(Outcome::Renumbered(2)).unwrap();
        assert_eq!(json["type"], "renumbered");
        assert_eq!(json["data"], 2);
    }
}
