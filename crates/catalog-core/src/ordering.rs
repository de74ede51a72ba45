//! # Ordering Module
//!
//! Sibling order assignment.
//!
//! Every category and product carries a zero-based `order` that is only
//! meaningful inside its sibling group. After any structural change the
//! members of a touched group must again hold `0..n-1`, each value once.
//!
//! ## Gap Closing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Before (Berries deleted)          After close_gaps                     │
//! │                                                                         │
//! │  Apples   order 0                  Apples   order 0  (unchanged)        │
//! │  ░░░░░░   order 1  ← gap           Cherries order 1  ← assignment       │
//! │  Cherries order 2                  Grapes   order 2  ← assignment       │
//! │  Grapes   order 3                                                       │
//! │                                                                         │
//! │  Only changed rows are returned, so the store writes the minimum.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ties (two siblings sharing an order after a crash) are broken by id so
//! the result is deterministic.

use std::collections::BTreeMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Category, CategoryId, Product};

// =============================================================================
// Sequenced Trait
// =============================================================================

/// A record that holds a position inside a sibling group.
pub trait Sequenced {
    /// Key shared by all siblings.
    type Group: Eq + Hash + Ord + Copy;

    fn id(&self) -> i64;
    fn group(&self) -> Self::Group;
    fn order(&self) -> i64;
}

impl Sequenced for Category {
    type Group = Option<CategoryId>;

    fn id(&self) -> i64 {
        self.id
    }

    fn group(&self) -> Self::Group {
        self.parent_id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

impl Sequenced for Product {
    type Group = CategoryId;

    fn id(&self) -> i64 {
        self.id
    }

    fn group(&self) -> Self::Group {
        self.category_id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

// =============================================================================
// Assignments
// =============================================================================

/// A single `order` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderAssignment {
    pub id: i64,
    pub order: i64,
}

/// Assigns each id its index in `ordered`.
///
/// ```rust
/// use catalog_core::ordering::{positions_for, OrderAssignment};
///
/// assert_eq!(
///     positions_for(&[9, 4]),
///     vec![OrderAssignment { id: 9, order: 0 }, OrderAssignment { id: 4, order: 1 }]
/// );
/// ```
pub fn positions_for(ordered: &[i64]) -> Vec<OrderAssignment> {
    ordered
        .iter()
        .enumerate()
        .map(|(index, id)| OrderAssignment {
            id: *id,
            order: index as i64,
        })
        .collect()
}

/// Renumbers every sibling group present in `items` to `0..n-1`,
/// preserving the current relative order.
///
/// Returns only the assignments whose value differs from the stored one.
pub fn close_gaps<T: Sequenced>(items: &[T]) -> Vec<OrderAssignment> {
    let mut groups: BTreeMap<T::Group, Vec<&T>> = BTreeMap::new();
    for item in items {
        groups.entry(item.group()).or_default().push(item);
    }

    let mut changes = Vec::new();
    for members in groups.values_mut() {
        members.sort_by_key(|m| (m.order(), m.id()));
        for (index, member) in members.iter().enumerate() {
            let order = index as i64;
            if member.order() != order {
                changes.push(OrderAssignment {
                    id: member.id(),
                    order,
                });
            }
        }
    }

    changes
}

/// True if every sibling group in `items` holds exactly `0..n-1`.
pub fn is_contiguous<T: Sequenced>(items: &[T]) -> bool {
    close_gaps(items).is_empty()
}

/// Order given to a record appended to a group of `count` members.
#[inline]
pub const fn next_order(count: i64) -> i64 {
    count
}

/// Moves `moved` to `to_index` inside `ordered`, clamping to the end.
///
/// Returns `None` if `moved` is not in `ordered`.
///
/// ```rust
/// use catalog_core::ordering::move_within;
///
/// assert_eq!(move_within(&[1, 2, 3], 3, 0), Some(vec![3, 1, 2]));
/// assert_eq!(move_within(&[1, 2, 3], 1, 99), Some(vec![2, 3, 1]));
/// ```
pub fn move_within(ordered: &[i64], moved: i64, to_index: usize) -> Option<Vec<i64>> {
    let from = ordered.iter().position(|id| *id == moved)?;
    let mut result = ordered.to_vec();
    let id = result.remove(from);
    let to = to_index.min(result.len());
    result.insert(to, id);
    Some(result)
}

// =============================================================================
// Unit Tests
// =============================================================================
