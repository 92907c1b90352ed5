//! # Validation Module
//!
//! Business-rule validation for inputs crossing into the workflow engine.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: Transport (out of scope)  - deserialization, basic shape
//! Layer 2: THIS MODULE               - business rule validation
//! Layer 3: Database                  - NOT NULL / UNIQUE / CHECK backstops
//! ```
//! Defense in depth: each layer catches a different class of mistake. A
//! purchase request that passes this module can still fail inside the
//! transaction (unknown product, insufficient stock) — those are workflow
//! errors, not validation errors.

use crate::error::{ValidationError, ValidationResult};
use crate::types::PurchaseLine;
use crate::{MAX_LINE_QUANTITY, MAX_PURCHASE_LINES};

// =============================================================================
// Purchase Validation
// =============================================================================

/// Validates a purchase request before any database work starts.
///
/// ## Rules
/// - At least one line (an empty purchase is rejected outright, never
///   stored as a zero-item order)
/// - Every quantity strictly positive
/// - No more than [`MAX_PURCHASE_LINES`] lines
/// - No line quantity above [`MAX_LINE_QUANTITY`]
///
/// ## Example
/// ```rust
/// use shopfront_core::types::PurchaseLine;
/// use shopfront_core::validation::validate_purchase;
///
/// assert!(validate_purchase(&[PurchaseLine::new("p-1", 2)]).is_ok());
/// assert!(validate_purchase(&[]).is_err());
/// assert!(validate_purchase(&[PurchaseLine::new("p-1", 0)]).is_err());
/// ```
pub fn validate_purchase(lines: &[PurchaseLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if lines.len() > MAX_PURCHASE_LINES {
        return Err(ValidationError::TooLarge {
            field: "items".to_string(),
            max: MAX_PURCHASE_LINES as i64,
        });
    }

    for line in lines {
        if line.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            });
        }

        if line.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }

        if line.quantity > MAX_LINE_QUANTITY {
            return Err(ValidationError::TooLarge {
                field: "quantity".to_string(),
                max: MAX_LINE_QUANTITY,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Catalog Validation
// =============================================================================

/// Validates product fields before insert/update.
///
/// ## Rules
/// - Name non-empty, at most 200 characters
/// - Prices non-negative (a free promotional item is legal; a negative
///   price is not)
/// - Initial stock non-negative
pub fn validate_product_input(
    name: &str,
    retail_price_cents: i64,
    wholesale_price_cents: i64,
    quantity: i64,
) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    if retail_price_cents < 0 {
        return Err(ValidationError::InvalidFormat {
            field: "retail_price".to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    if wholesale_price_cents < 0 {
        return Err(ValidationError::InvalidFormat {
            field: "wholesale_price".to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    if quantity < 0 {
        return Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    Ok(())
}

/// Validates a username for registration.
///
/// ## Rules
/// - Non-empty, at most 50 characters
/// - Letters, digits, hyphens, underscores only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
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
    fn test_empty_purchase_rejected() {
        let err = validate_purchase(&[]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "items".to_string()
            }
        );
    }

    #[test]
    fn test_zero_and_negative_quantities_rejected() {
        let err = validate_purchase(&[PurchaseLine::new("p-1", 0)]).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { .. }));

        let err = validate_purchase(&[PurchaseLine::new("p-1", -3)]).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { .. }));
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        let err = validate_purchase(&[PurchaseLine::new("p-1", MAX_LINE_QUANTITY + 1)])
            .unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn test_too_many_lines_rejected() {
        let lines: Vec<_> = (0..=MAX_PURCHASE_LINES)
            .map(|i| PurchaseLine::new(format!("p-{}", i), 1))
            .collect();
        let err = validate_purchase(&lines).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn test_blank_product_id_rejected() {
        let err = validate_purchase(&[PurchaseLine::new("  ", 1)]).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn test_valid_purchase_passes() {
        let lines = [
            PurchaseLine::new("p-1", 2),
            PurchaseLine::new("p-2", 1),
            PurchaseLine::new("p-1", 1), // duplicate product ids are legal
        ];
        assert!(validate_purchase(&lines).is_ok());
    }

    #[test]
    fn test_product_input_rules() {
        assert!(validate_product_input("Widget", 1099, 750, 10).is_ok());
        assert!(validate_product_input("", 1099, 750, 10).is_err());
        assert!(validate_product_input("Widget", -1, 750, 10).is_err());
        assert!(validate_product_input("Widget", 1099, -1, 10).is_err());
        assert!(validate_product_input("Widget", 1099, 750, -5).is_err());
        assert!(validate_product_input(&"x".repeat(201), 1, 1, 1).is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }
}
