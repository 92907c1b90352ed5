//! # Database & Workflow Error Types
//!
//! ## Error Flow
//! ```text
//! SQLite error (sqlx::Error)
//!      │
//!      ▼
//! DbError          ← infrastructure: connection, migration, constraints
//!      │
//!      ▼
//! WorkflowError    ← the client-visible taxonomy (§ this module)
//!      │
//!      ▼
//! ErrorPayload     ← serialized { category, message } at the boundary
//! ```
//!
//! `DbError` says *the database misbehaved*; `WorkflowError` says *the
//! request cannot be honored* (unknown product, not enough stock, forbidden
//! caller, illegal status change). The transport layer maps categories to
//! status codes and never needs to parse messages.

use serde::Serialize;
use thiserror::Error;

use shopfront_core::{TransitionError, ValidationError};

// =============================================================================
// Infrastructure Errors
// =============================================================================

/// Database operation errors.
///
/// Wrap sqlx errors with enough categorization that callers can
/// distinguish "record missing" from "constraint tripped" from "the
/// database is unwell".
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found where one was required.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (duplicate username, duplicate
    /// watchlist row, ...).
    #[error("duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not complete (including lost status-guard races).
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Maps sqlx errors onto the DbError categories.
///
/// SQLite reports constraint failures as database errors with
/// recognizable message prefixes; everything else is passed through with
/// its original text.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for infrastructure-level database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Workflow Errors
// =============================================================================

/// Client-visible failures of workflow operations.
///
/// Every variant is recoverable at the boundary; none is fatal to the
/// process. The variants carry the identity of the offending entity so
/// error messages can name it.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A requested product does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The order does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// Requested quantity exceeds available stock. The whole purchase
    /// fails; nothing was reserved.
    #[error("not enough stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Status change forbidden by the transition table.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Caller is neither the owner nor an admin.
    #[error("user {user_id} may not modify order {order_id}")]
    Forbidden { user_id: String, order_id: String },

    /// Input rejected before any database work.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl WorkflowError {
    /// Stable machine-readable category for the boundary payload.
    pub fn category(&self) -> ErrorCategory {
        match self {
            WorkflowError::ProductNotFound(_) | WorkflowError::OrderNotFound(_) => {
                ErrorCategory::NotFound
            }
            WorkflowError::InsufficientStock { .. } => ErrorCategory::InsufficientStock,
            WorkflowError::InvalidTransition(_) => ErrorCategory::InvalidTransition,
            WorkflowError::Forbidden { .. } => ErrorCategory::Forbidden,
            WorkflowError::Validation(_) => ErrorCategory::ValidationError,
            WorkflowError::Db(_) => ErrorCategory::DatabaseError,
        }
    }
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

// =============================================================================
// Boundary Payload
// =============================================================================

/// Error categories as the transport layer sees them.
///
/// Serialized SCREAMING_SNAKE_CASE; the mapping to HTTP status codes
/// (404/403/400/500) lives in the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    NotFound,
    InsufficientStock,
    InvalidTransition,
    Forbidden,
    ValidationError,
    DatabaseError,
}

/// Serializable error payload returned across the boundary.
///
/// ```json
/// { "category": "INSUFFICIENT_STOCK",
///   "message": "not enough stock for product p-7: available 1, requested 999" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
}

impl From<&WorkflowError> for ErrorPayload {
    fn from(err: &WorkflowError) -> Self {
        let message = match err {
            // Internal detail stays in the logs, not in the response.
            WorkflowError::Db(inner) => {
                tracing::error!(error = %inner, "database failure surfaced at workflow boundary");
                "internal storage error".to_string()
            }
            other => other.to_string(),
        };

        ErrorPayload {
            category: err.category(),
            message,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use shopfront_core::OrderStatus;

    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_product() {
        let err = WorkflowError::InsufficientStock {
            product_id: "p-7".to_string(),
            available: 1,
            requested: 999,
        };
        assert_eq!(
            err.to_string(),
            "not enough stock for product p-7: available 1, requested 999"
        );
        assert_eq!(err.category(), ErrorCategory::InsufficientStock);
    }

    #[test]
    fn test_transition_error_passes_through() {
        let err = WorkflowError::from(TransitionError {
            from: OrderStatus::Completed,
            to: OrderStatus::Canceled,
        });
        assert_eq!(err.to_string(), "completed orders cannot be canceled");
        assert_eq!(err.category(), ErrorCategory::InvalidTransition);
    }

    #[test]
    fn test_payload_serialization() {
        let err = WorkflowError::OrderNotFound("o-1".to_string());
        let payload = ErrorPayload::from(&err);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["category"], "NOT_FOUND");
        assert_eq!(json["message"], "order not found: o-1");
    }

    #[test]
    fn test_db_detail_is_not_leaked() {
        let err = WorkflowError::Db(DbError::QueryFailed("secret table layout".to_string()));
        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.message, "internal storage error");
        assert_eq!(payload.category, ErrorCategory::DatabaseError);
    }
}
