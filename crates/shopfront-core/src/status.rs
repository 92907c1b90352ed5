//! # Order Status Rules
//!
//! The order lifecycle and its admissible transitions.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  current     requested    outcome                           │
//! │  ──────────  ───────────  ────────────────────────────────  │
//! │  Processing  Completed    allowed                           │
//! │  Processing  Canceled     allowed (caller must restock)     │
//! │  Completed   Canceled     rejected                          │
//! │  Canceled    Completed    rejected                          │
//! │  Completed   Completed    rejected (no silent no-op)        │
//! │  Canceled    Canceled     rejected ("already canceled")     │
//! │  any         Processing   rejected                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Completed and Canceled are terminal and mutually unreachable. Because
//! Canceled is only ever reached from Processing, stock restoration runs
//! exactly once per order: the transaction that performs the transition is
//! the one that releases the reserved quantities.

use serde::{Deserialize, Serialize};

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, stock reserved, awaiting fulfillment.
    Processing,
    /// Order fulfilled. Terminal.
    Completed,
    /// Order canceled, stock returned. Terminal.
    Canceled,
}

impl OrderStatus {
    /// Checks whether this status is terminal.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }

    /// Validates a status change against the transition table.
    ///
    /// ## Returns
    /// * `Ok(())` - the transition is admissible
    /// * `Err(TransitionError)` - forbidden, with a message naming why
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError> {
        match (from, to) {
            (OrderStatus::Processing, OrderStatus::Completed)
            | (OrderStatus::Processing, OrderStatus::Canceled) => Ok(()),
            _ => Err(TransitionError { from, to }),
        }
    }

    /// Stable lowercase label, matching the database TEXT encoding.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Processing
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transition Error
// =============================================================================

/// A status change forbidden by the transition table.
///
/// Display is implemented by hand because the message depends on the pair,
/// not just the fields ("completed orders cannot be canceled" reads better
/// than a generic from/to sentence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    /// Status the order currently holds.
    pub from: OrderStatus,
    /// Status that was requested.
    pub to: OrderStatus,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.from, self.to) {
            (OrderStatus::Completed, OrderStatus::Canceled) => {
                f.write_str("completed orders cannot be canceled")
            }
            (OrderStatus::Canceled, OrderStatus::Completed) => {
                f.write_str("canceled orders cannot be completed")
            }
            (OrderStatus::Canceled, OrderStatus::Canceled) => {
                f.write_str("order has already been canceled")
            }
            (OrderStatus::Completed, OrderStatus::Completed) => {
                f.write_str("order has already been completed")
            }
            (from, to) => write!(f, "order status cannot change from {} to {}", from, to),
        }
    }
}

impl std::error::Error for TransitionError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_reaches_both_terminals() {
        assert!(
            OrderStatus::validate_transition(OrderStatus::Processing, OrderStatus::Completed)
                .is_ok()
        );
        assert!(
            OrderStatus::validate_transition(OrderStatus::Processing, OrderStatus::Canceled)
                .is_ok()
        );
    }

    #[test]
    fn test_terminals_are_mutually_unreachable() {
        let err =
            OrderStatus::validate_transition(OrderStatus::Completed, OrderStatus::Canceled)
                .unwrap_err();
        assert_eq!(err.to_string(), "completed orders cannot be canceled");

        let err =
            OrderStatus::validate_transition(OrderStatus::Canceled, OrderStatus::Completed)
                .unwrap_err();
        assert_eq!(err.to_string(), "canceled orders cannot be completed");
    }

    #[test]
    fn test_same_terminal_status_is_rejected() {
        let err =
            OrderStatus::validate_transition(OrderStatus::Canceled, OrderStatus::Canceled)
                .unwrap_err();
        assert_eq!(err.to_string(), "order has already been canceled");

        let err =
            OrderStatus::validate_transition(OrderStatus::Completed, OrderStatus::Completed)
                .unwrap_err();
        assert_eq!(err.to_string(), "order has already been completed");
    }

    #[test]
    fn test_nothing_returns_to_processing() {
        for from in [
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Canceled,
        ] {
            assert!(OrderStatus::validate_transition(from, OrderStatus::Processing).is_err());
        }
    }

    #[test]
    fn test_terminal_flags() {
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_text_encoding_is_lowercase() {
        assert_eq!(OrderStatus::Processing.as_str(), "processing");
        assert_eq!(OrderStatus::Completed.as_str(), "completed");
        assert_eq!(OrderStatus::Canceled.as_str(), "canceled");
    }
}
