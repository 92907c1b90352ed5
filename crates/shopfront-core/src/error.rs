//! # Error Types
//!
//! Input validation errors for shopfront-core.
//!
//! ## Where Errors Live
//! ```text
//! shopfront-core (this file)
//! ├── ValidationError  - malformed input, rejected before any I/O
//! └── TransitionError  - forbidden status change (see status.rs)
//!
//! shopfront-db
//! ├── DbError          - infrastructure failures (connection, SQL)
//! └── WorkflowError    - the client-visible taxonomy (not found,
//!                        insufficient stock, forbidden, ...)
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive, never manual boilerplate
//! 2. Errors carry context (field names, limits), never bare strings
//! 3. Enum variants, so callers can match instead of parsing messages

use thiserror::Error;

/// Input validation failures.
///
/// Raised before business logic runs; the caller gets these back verbatim
/// as 400-class responses at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field or collection is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value exceeds an allowed maximum.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: i64 },

    /// Value has an invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Result type alias for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items is required");

        let err = ValidationError::TooLarge {
            field: "quantity".to_string(),
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must not exceed 999");
    }
}
