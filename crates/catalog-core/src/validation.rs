//! # Validation Module
//!
//! Input validation for catalog records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI dialogs                                                   │
//! │  └── Trimmed input, immediate feedback                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Non-empty labels and descriptions                                 │
//! │  └── Orderings: no duplicates, exactly one sibling group               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Deferred foreign keys                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::validate_label;
//!
//! let label = validate_label("label", "  Fruits ").unwrap();
//! assert_eq!(label, "Fruits");
//! assert!(validate_label("label", "   ").is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Text Validators
// =============================================================================

fn validate_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Validates a category or product label.
///
/// ## Rules
/// - Must not be empty after trimming
///
/// ## Returns
/// The trimmed label, ready to persist.
pub fn validate_label(field: &str, label: &str) -> ValidationResult<String> {
    validate_text(field, label)
}

/// Validates a product description.
///
/// ## Rules
/// - Must not be empty after trimming
pub fn validate_description(description: &str) -> ValidationResult<String> {
    validate_text("description", description)
}

/// Validates both text fields of a product, label first.
pub fn validate_product_fields(
    label: &str,
    description: &str,
) -> ValidationResult<(String, String)> {
    let label = validate_label("label", label)?;
    let description = validate_description(description)?;
    Ok((label, description))
}

// =============================================================================
// Ordering Validators
// =============================================================================

/// Validates an ordering supplied by the drag collaborator.
///
/// ## Rules
/// - No id may appear twice
/// - The ids must be exactly the members of one sibling group
///
/// ```rust
/// use catalog_core::validation::validate_ordering;
///
/// assert!(validate_ordering(&[3, 1, 2], &[1, 2, 3]).is_ok());
/// assert!(validate_ordering(&[3, 3, 2], &[1, 2, 3]).is_err());
/// assert!(validate_ordering(&[3, 1], &[1, 2, 3]).is_err());
/// ```
pub fn validate_ordering(ordered: &[i64], group: &[i64]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(ordered.len());
    for id in ordered {
        if !seen.insert(*id) {
            return Err(ValidationError::Duplicate {
                field: "ordering".to_string(),
                value: *id,
            });
        }
    }

    let members: HashSet<i64> = group.iter().copied().collect();
    if seen != members {
        return Err(ValidationError::IncompleteGroup {
            field: "ordering".to_string(),
            expected: members.len(),
            actual: ordered.len(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_label() {
        assert_eq!(validate_label("label", "Fruits").unwrap(), "Fruits");
        assert_eq!(validate_label("label", "  Citrus\n").unwrap(), "Citrus");

        assert!(validate_label("label", "").is_err());
        assert!(validate_label("label", "   ").is_err());
    }

    #[test]
    fn test_long_text_is_accepted() {
        let label = "A".repeat(5_000);
        assert_eq!(validate_label("label", &label).unwrap(), label);

        let description = "word ".repeat(10_000);
        assert_eq!(
            validate_description(&description).unwrap(),
            description.trim_end()
        );
    }

    #[test]
    fn test_validate_label_reports_field() {
        let err = validate_label("sub-category", "").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "sub-category".to_string()
            }
        );
    }

    #[test]
    fn test_validate_product_fields() {
        let (label, description) = validate_product_fields(" Lemon ", "Sour citrus fruit").unwrap();
        assert_eq!(label, "Lemon");
        assert_eq!(description, "Sour citrus fruit");

        assert!(validate_product_fields("Lemon", "").is_err());
        assert!(validate_product_fields("", "Sour citrus fruit").is_err());
    }

    #[test]
    fn test_validate_ordering() {
        assert!(validate_ordering(&[], &[]).is_ok());
        assert!(validate_ordering(&[2, 1], &[1, 2]).is_ok());

        assert_eq!(
            validate_ordering(&[1, 1], &[1, 2]),
            Err(ValidationError::Duplicate {
                field: "ordering".to_string(),
                value: 1
            })
        );
        assert!(validate_ordering(&[1, 2, 9], &[1, 2]).is_err());
        assert!(validate_ordering(&[1], &[1, 2]).is_err());
    }
}
