//! # Dialogs and Clipboard
//!
//! Modal flows carry their target ids from the moment they open until they
//! are confirmed, so nothing about "the current selection" lives anywhere
//! else.
//!
//! ```text
//! right-click "Citrus" ──► Dialog::RenameCategory { id: 2, .. }
//!                                   │  user types "Lemons"
//!                                   ▼
//!                          dialog.confirm(DialogInput::Text("Lemons"))
//!                                   │
//!                                   ▼
//!                          Action::RenameCategory { id: 2, label: "Lemons" }
//! ```

use catalog_core::validation::{validate_label, validate_product_fields};
use catalog_core::{Category, CategoryId, Product, ProductId};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ApiError;

// =============================================================================
// Dialog
// =============================================================================

/// An open modal, with everything it needs to build its action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dialog", rename_all = "camelCase")]
pub enum Dialog {
    /// New category; `parent_id` is set when opened from a category's
    /// "add sub-category" entry.
    #[serde(rename_all = "camelCase")]
    AddCategory { parent_id: Option<CategoryId> },

    RenameCategory { id: CategoryId, current: String },

    /// Confirmation before a cascade delete.
    DeleteCategory { id: CategoryId, label: String },

    #[serde(rename_all = "camelCase")]
    AddProduct { category_id: CategoryId },

    EditProduct {
        id: ProductId,
        label: String,
        description: String,
    },

    DeleteProduct { id: ProductId, label: String },
}

/// What the user entered before pressing OK or Cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "camelCase")]
pub enum DialogInput {
    Text { value: String },
    Product { label: String, description: String },
    Confirm { accepted: bool },
}

impl Dialog {
    /// Window title.
    pub fn title(&self) -> String {
        match self {
            Dialog::AddCategory { parent_id: None } => "New category".to_string(),
            Dialog::AddCategory { parent_id: Some(_) } => "New sub-category".to_string(),
            Dialog::RenameCategory { current, .. } => format!("Rename \"{}\"", current),
            Dialog::DeleteCategory { label, .. } => {
                format!("Delete \"{}\" and everything under it?", label)
            }
            Dialog::AddProduct { .. } => "New product".to_string(),
            Dialog::EditProduct { label, .. } => format!("Edit \"{}\"", label),
            Dialog::DeleteProduct { label, .. } => format!("Delete \"{}\"?", label),
        }
    }

    /// Turns the user's input into an action.
    ///
    /// Returns `Ok(None)` when the dialog was cancelled. Text is validated
    /// here so an empty label never reaches the store; the store validates
    /// again regardless.
    pub fn confirm(self, input: DialogInput) -> Result<Option<Action>, ApiError> {
        let action = match (self, input) {
            (_, DialogInput::Confirm { accepted: false }) => return Ok(None),

            (Dialog::AddCategory { parent_id }, DialogInput::Text { value }) => {
                Action::AddCategory {
                    label: validate_label("label", &value)?,
                    parent_id,
                }
            }
            (Dialog::RenameCategory { id, .. }, DialogInput::Text { value }) => {
                Action::RenameCategory {
                    id,
                    label: validate_label("label", &value)?,
                }
            }
            (Dialog::DeleteCategory { id, .. }, DialogInput::Confirm { accepted: true }) => {
                Action::DeleteCategory { id }
            }
            (Dialog::AddProduct { category_id }, DialogInput::Product { label, description }) => {
                let (label, description) = validate_product_fields(&label, &description)?;
                Action::AddProduct {
                    label,
                    description,
                    category_id,
                }
            }
            (Dialog::EditProduct { id, .. }, DialogInput::Product { label, description }) => {
                let (label, description) = validate_product_fields(&label, &description)?;
                Action::EditProduct {
                    id,
                    label,
                    description,
                }
            }
            (Dialog::DeleteProduct { id, .. }, DialogInput::Confirm { accepted: true }) => {
                Action::DeleteProduct { id }
            }
            (dialog, input) => {
                return Err(ApiError::validation(format!(
                    "{:?} does not accept {:?}",
                    dialog, input
                )))
            }
        };

        Ok(Some(action))
    }
}

// =============================================================================
// Clipboard
// =============================================================================

/// A snapshot of what was copied, taken at copy time.
///
/// Pasting works from the snapshot, so the source may be renamed or
/// deleted in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Copied {
    Category { label: String },
    Product { label: String, description: String },
}

/// Copy buffer owned by the editing session.
///
/// Pasting does not empty it, so one copy can be pasted several times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clipboard {
    content: Option<Copied>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the category record only; its children and products are
    /// not part of the copy.
    pub fn copy_category(&mut self, category: &Category) {
        self.content = Some(Copied::Category {
            label: category.label.clone(),
        });
    }

    pub fn copy_product(&mut self, product: &Product) {
        self.content = Some(Copied::Product {
            label: product.label.clone(),
            description: product.description.clone(),
        });
    }

    pub fn content(&self) -> Option<&Copied> {
        self.content.as_ref()
    }

    pub fn clear(&mut self) {
        self.content = None;
    }

    /// Paste action for the category `target` was right-clicked on.
    ///
    /// A copied category becomes a child of `target`; a copied product is
    /// appended to `target`'s products.
    pub fn paste_into(&self, target: CategoryId) -> Option<Action> {
        match self.content.as_ref()? {
            Copied::Category { label } => Some(Action::PasteCategory {
                label: label.clone(),
                target_parent: Some(target),
            }),
            Copied::Product { label, description } => Some(Action::PasteProduct {
                label: label.clone(),
                description: description.clone(),
                target_category: target,
            }),
        }
    }

    /// Paste action for the empty area of the tree. Products need a
    /// category, so only a copied category can land here.
    pub fn paste_at_top_level(&self) -> Option<Action> {
        match self.content.as_ref()? {
            Copied::Category { label } => Some(Action::PasteCategory {
                label: label.clone(),
                target_parent: None,
            }),
            Copied::Product { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Utc;

    fn text(value: &str) -> DialogInput {
        DialogInput::Text {
            value: value.to_string(),
        }
    }

    #[test]
    fn test_sub_category_dialog_keeps_parent() {
        let dialog = Dialog::AddCategory { parent_id: Some(4) };
        assert_eq!(dialog.title(), "New sub-category");

        let action = dialog.confirm(text("  Citrus ")).unwrap();
        assert_eq!(
            action,
            Some(Action::AddCategory {
                label: "Citrus".into(),
                parent_id: Some(4)
            })
        );
    }

    #[test]
    fn test_rename_with_empty_label_is_rejected() {
        let dialog = Dialog::RenameCategory {
            id: 2,
            current: "Citrus".into(),
        };
        let err = dialog.confirm(text("   ")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_cancel_yields_no_action() {
        let dialog = Dialog::DeleteCategory {
            id: 1,
            label: "Fruits".into(),
        };
        assert_eq!(
            dialog.confirm(DialogInput::Confirm { accepted: false }).unwrap(),
            None
        );
    }

    #[test]
    fn test_delete_confirmation() {
        let dialog = Dialog::DeleteProduct {
            id: 9,
            label: "Meyer".into(),
        };
        assert_eq!(
            dialog.confirm(DialogInput::Confirm { accepted: true }).unwrap(),
            Some(Action::DeleteProduct { id: 9 })
        );
    }

    #[test]
    fn test_product_dialog_requires_description() {
        let dialog = Dialog::AddProduct { category_id: 3 };
        let err = dialog
            .confirm(DialogInput::Product {
                label: "Lemon".into(),
                description: "".into(),
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_mismatched_input_is_rejected() {
        let dialog = Dialog::AddProduct { category_id: 3 };
        assert!(dialog.confirm(text("Lemon")).is_err());
    }

    fn category(id: CategoryId, label: &str) -> Category {
        Category {
            id,
            label: label.to_string(),
            parent_id: None,
            order: 0,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    fn product(id: ProductId, label: &str, description: &str) -> Product {
        Product {
            id,
            label: label.to_string(),
            description: description.to_string(),
            category_id: 1,
            order: 0,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    #[test]
    fn test_clipboard_paste() {
        let mut clipboard = Clipboard::new();
        assert_eq!(clipboard.paste_into(1), None);

        clipboard.copy_product(&product(7, "Meyer", "Sweet lemon"));
        assert_eq!(
            clipboard.paste_into(2),
            Some(Action::PasteProduct {
                label: "Meyer".into(),
                description: "Sweet lemon".into(),
                target_category: 2
            })
        );
        assert_eq!(clipboard.paste_at_top_level(), None);
        // still there after pasting
        assert!(matches!(clipboard.content(), Some(Copied::Product { .. })));

        clipboard.copy_category(&category(3, "Citrus"));
        assert_eq!(
            clipboard.paste_at_top_level(),
            Some(Action::PasteCategory {
                label: "Citrus".into(),
                target_parent: None
            })
        );

        clipboard.clear();
        assert_eq!(clipboard.content(), None);
    }

    #[test]
    fn test_copy_is_a_snapshot() {
        let mut clipboard = Clipboard::new();
        let mut citrus = category(3, "Citrus");
        clipboard.copy_category(&citrus);

        citrus.label = "Lemons & Limes".into();

        assert_eq!(
            clipboard.paste_into(5),
            Some(Action::PasteCategory {
                label: "Citrus".into(),
                target_parent: Some(5)
            })
        );
    }
}
