//! # Action Dispatcher
//!
//! Executes [`Action`]s against the store and keeps the view in step.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CatalogEditor::dispatch                          │
//! │                                                                         │
//! │  Action ──► execute ──► catalog-db repository call(s)                  │
//! │                │                                                        │
//! │        ┌───────┴────────┐                                               │
//! │        ▼                ▼                                               │
//! │     Ok(outcome)      Err(ApiError)                                      │
//! │        │                │                                               │
//! │        │                ├── log (warn, or error for storage)            │
//! │        │                └── notify(failure)     view NOT refreshed      │
//! │        │                                                                │
//! │        ├── notify(success)          (mutations only)                    │
//! │        └── reload tree and/or product lists named by the action        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Drops
//! A drop is resolved by [`plan_drop`] first. Reorders renumber one sibling
//! group; cross-container drops use the composite move (append at the end
//! of the destination, close the gap in the source) and reload the tree.

use catalog_core::validation::validate_ordering;
use catalog_core::{copy_label, plan_drop, CategoryId, Container, DropEvent, DropPlan};
use catalog_db::Database;
use tracing::{debug, info, warn};

use crate::action::{Action, Outcome};
use crate::error::{ApiError, ErrorCode};
use crate::sink::{Notice, ViewSink};

// =============================================================================
// Refresh
// =============================================================================

/// Views to reload after a successful mutation.
#[derive(Debug, Default)]
struct Refresh {
    tree: bool,
    products: Vec<CategoryId>,
}

impl Refresh {
    fn none() -> Self {
        Refresh::default()
    }

    fn tree() -> Self {
        Refresh {
            tree: true,
            products: Vec::new(),
        }
    }

    fn products(category_id: CategoryId) -> Self {
        Refresh {
            tree: false,
            products: vec![category_id],
        }
    }

    fn tree_and_products(products: Vec<CategoryId>) -> Self {
        Refresh {
            tree: true,
            products,
        }
    }
}

// =============================================================================
// CatalogEditor
// =============================================================================

/// Single entry point for every editor action.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(config.db_config()?).await?;
/// let mut editor = CatalogEditor::new(db, JsonLinesSink::new(std::io::stdout()));
///
/// editor.dispatch(Action::LoadCategories).await?;
/// editor.dispatch(Action::AddCategory { label: "Fruits".into(), parent_id: None }).await?;
/// ```
pub struct CatalogEditor<S: ViewSink> {
    db: Database,
    sink: S,
}

impl<S: ViewSink> CatalogEditor<S> {
    pub fn new(db: Database, sink: S) -> Self {
        CatalogEditor { db, sink }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Runs one action, notifies the sink, and refreshes the affected views.
    ///
    /// On failure the sink gets a failure notice and nothing is re-rendered.
    pub async fn dispatch(&mut self, action: Action) -> Result<Outcome, ApiError> {
        let name = action.name();
        let mutation = action.is_mutation();

        debug!(action = name, "Dispatching action");

        match self.execute(action).await {
            Ok((outcome, refresh)) => {
                match &outcome {
                    Outcome::Tree(rows) => self.sink.render_tree(rows),
                    Outcome::Products {
                        category_id,
                        products,
                    } => self.sink.render_products(*category_id, products),
                    _ => {}
                }

                if mutation {
                    info!(action = name, "Action completed");
                    self.sink.notify(Notice::success(outcome.summary()));
                }

                self.refresh(refresh).await;
                Ok(outcome)
            }
            Err(err) => {
                // storage failures were already logged at error level
                if err.code != ErrorCode::StorageError {
                    warn!(action = name, code = ?err.code, error = %err.message, "Action failed");
                }
                self.sink.notify(Notice::failure(&err));
                Err(err)
            }
        }
    }

    async fn execute(&self, action: Action) -> Result<(Outcome, Refresh), ApiError> {
        let categories = self.db.categories();
        let products = self.db.products();

        let result = match action {
            Action::LoadCategories => (Outcome::Tree(categories.tree().await?), Refresh::none()),

            Action::LoadProducts { category_id } => {
                if categories.get_by_id(category_id).await?.is_none() {
                    return Err(catalog_db::DbError::category_not_found(category_id).into());
                }
                let list = products.list_by_category(category_id).await?;
                (
                    Outcome::Products {
                        category_id,
                        products: list,
                    },
                    Refresh::none(),
                )
            }

            Action::AddCategory { label, parent_id } => {
                let category = categories.add(&label, parent_id).await?;
                (Outcome::Category(category), Refresh::tree())
            }

            Action::RenameCategory { id, label } => {
                let category = categories.rename(id, &label).await?;
                (Outcome::Category(category), Refresh::tree())
            }

            Action::DeleteCategory { id } => {
                let report = categories.delete_cascade(id).await?;
                (Outcome::CategoryDeleted(report), Refresh::tree())
            }

            Action::AddProduct {
                label,
                description,
                category_id,
            } => {
                let product = products.add(&label, &description, category_id).await?;
                (Outcome::Product(product), Refresh::products(category_id))
            }

            Action::EditProduct {
                id,
                label,
                description,
            } => {
                let product = products.edit(id, &label, &description).await?;
                let refresh = Refresh::products(product.category_id);
                (Outcome::Product(product), refresh)
            }

            Action::DeleteProduct { id } => {
                let product = products.delete(id).await?;
                let refresh = Refresh::tree_and_products(vec![product.category_id]);
                (Outcome::ProductDeleted(product), refresh)
            }

            Action::Drop(event) => self.execute_drop(event).await?,

            Action::PasteCategory {
                label,
                target_parent,
            } => {
                let copy = categories.add(&copy_label(&label), target_parent).await?;
                (Outcome::Category(copy), Refresh::tree())
            }

            Action::PasteProduct {
                label,
                description,
                target_category,
            } => {
                let copy = products
                    .add(
                        &copy_label(&label),
                        &copy_label(&description),
                        target_category,
                    )
                    .await?;
                (Outcome::Product(copy), Refresh::products(target_category))
            }

            Action::NormalizeOrder => {
                let changed =
                    categories.normalize_order().await? + products.normalize_order().await?;
                (Outcome::Renumbered(changed), Refresh::tree())
            }
        };

        Ok(result)
    }

    async fn execute_drop(&self, event: DropEvent) -> Result<(Outcome, Refresh), ApiError> {
        let plan = plan_drop(&event)?;
        debug!(plan = ?plan, "Drop planned");

        let full_reload = plan.needs_full_reload();

        let (outcome, mut refresh) = match plan {
            DropPlan::ReorderCategories { parent_id, ordered } => {
                let categories = self.db.categories();
                // the list must be the group the drop happened in, not just any group
                let siblings: Vec<CategoryId> = categories
                    .children(parent_id)
                    .await?
                    .iter()
                    .map(|c| c.id)
                    .collect();
                validate_ordering(&ordered, &siblings)?;

                let changed = categories.recalculate_order(&ordered).await?;
                (Outcome::Renumbered(changed), Refresh::tree())
            }
            DropPlan::ReorderProducts {
                category_id,
                ordered,
            } => {
                let changed = self
                    .db
                    .products()
                    .recalculate_order(category_id, &ordered)
                    .await?;
                (Outcome::Renumbered(changed), Refresh::products(category_id))
            }
            DropPlan::ReparentCategory { id, new_parent } => {
                let moved = self.db.categories().move_to(id, new_parent).await?;
                (Outcome::Category(moved), Refresh::none())
            }
            DropPlan::MoveProduct { id, new_category } => {
                let moved = self.db.products().move_to(id, new_category).await?;
                let mut lists = Vec::with_capacity(2);
                if let Container::Products { category_id } = event.from {
                    if category_id != new_category {
                        lists.push(category_id);
                    }
                }
                lists.push(new_category);
                (Outcome::Product(moved), Refresh::tree_and_products(lists))
            }
        };

        if full_reload {
            refresh.tree = true;
        }

        Ok((outcome, refresh))
    }

    /// Reloads views after a mutation. A failed reload is reported but
    /// does not undo the mutation.
    async fn refresh(&mut self, refresh: Refresh) {
        if refresh.tree {
            match self.db.categories().tree().await {
                Ok(rows) => self.sink.render_tree(&rows),
                Err(e) => {
                    let err = ApiError::from(e);
                    self.sink.notify(Notice::failure(&err));
                }
            }
        }

        for category_id in refresh.products {
            match self.db.products().list_by_category(category_id).await {
                Ok(list) => self.sink.render_products(category_id, &list),
                Err(e) => {
                    let err = ApiError::from(e);
                    self.sink.notify(Notice::failure(&err));
                }
            }
        }
    }
}
