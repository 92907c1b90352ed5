//! # Inventory Store
//!
//! Stock reservation and release for the order workflow.
//!
//! ## The Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Overdraw Prevention                                  │
//! │                                                                         │
//! │  ❌ WRONG: read-check-write (races between check and write)             │
//! │     SELECT quantity ...; if quantity >= n { UPDATE ... }                │
//! │                                                                         │
//! │  ✅ CORRECT: guard inside the UPDATE itself                             │
//! │     UPDATE products SET quantity = quantity - n                         │
//! │     WHERE id = ? AND quantity >= n                                      │
//! │                                                                         │
//! │  rows_affected == 0 means the guard failed: either the product          │
//! │  does not exist, or there is not enough stock. One follow-up            │
//! │  SELECT on the same connection tells the two apart.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutating methods take an open connection so the workflow engine can
//! run many reservations inside one transaction; if any line fails, the
//! transaction rolls back and every earlier reservation is undone.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{WorkflowError, WorkflowResult};

/// Store for product stock levels.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    pool: SqlitePool,
}

impl InventoryStore {
    /// Creates a new InventoryStore.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryStore { pool }
    }

    /// Returns the current stock of a product.
    ///
    /// ## Returns
    /// * `Ok(quantity)` - Current units on hand (may be 0)
    /// * `Err(WorkflowError::ProductNotFound)` - Unknown product
    pub async fn quantity(&self, product_id: &str) -> WorkflowResult<i64> {
        let quantity: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(crate::error::DbError::from)?;

        quantity.ok_or_else(|| WorkflowError::ProductNotFound(product_id.to_string()))
    }

    /// Reserves `quantity` units of a product, atomically.
    ///
    /// The decrement only happens when enough stock exists; the guard and
    /// the write are one statement, so two concurrent purchases can never
    /// both take the last unit.
    ///
    /// ## Arguments
    /// * `conn` - Open transaction connection
    /// * `product_id` - Product to reserve from
    /// * `quantity` - Units to reserve (caller validates > 0)
    ///
    /// ## Returns
    /// * `Err(WorkflowError::ProductNotFound)` - Unknown product
    /// * `Err(WorkflowError::InsufficientStock)` - Guard failed; carries
    ///   the stock level observed at failure time
    pub async fn reserve(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        quantity: i64,
    ) -> WorkflowResult<()> {
        debug!(product_id = %product_id, quantity = %quantity, "Reserving stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - ?2,
                updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(chrono::Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(crate::error::DbError::from)?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        // Guard failed. Same connection, so this read sees the
        // transaction's own view of the stock level.
        let available: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(crate::error::DbError::from)?;

        match available {
            None => Err(WorkflowError::ProductNotFound(product_id.to_string())),
            Some(available) => Err(WorkflowError::InsufficientStock {
                product_id: product_id.to_string(),
                available,
                requested: quantity,
            }),
        }
    }

    /// Returns `quantity` units of a product to stock.
    ///
    /// Used by cancellation to undo a past reservation; there is no upper
    /// guard because release amounts come from recorded line items, never
    /// from client input.
    pub async fn release(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        quantity: i64,
    ) -> WorkflowResult<()> {
        debug!(product_id = %product_id, quantity = %quantity, "Releasing stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(chrono::Utc::now())
        .execute(conn)
        .await
        .map_err(crate::error::DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(WorkflowError::ProductNotFound(product_id.to_string()));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
