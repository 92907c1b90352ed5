//! # Order Ledger
//!
//! Orders and their line items, plus the guarded status transition.
//!
//! ## Status Transition Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set_status("o-1", Canceled)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT status  → processing                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_transition(processing → canceled)   (pure, shopfront-core)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE orders SET status = 'canceled'                                  │
//! │  WHERE id = ?1 AND status = 'processing'   ← re-checks the precondition │
//! │       │                                                                 │
//! │       └── rows_affected == 0 → someone else moved the status first;     │
//! │           the caller's transaction aborts                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The WHERE guard makes each transition fire at most once even under
//! concurrent requests, which is what lets cancellation restock exactly
//! once.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult, WorkflowError, WorkflowResult};
use crate::repository::new_id;
use shopfront_core::{Order, OrderItem, OrderStatus, Product};

const ORDER_COLUMNS: &str = "id, user_id, status, placed_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, line_no, quantity, \
     purchase_price_cents, wholesale_price_cents, created_at";

/// Repository for orders and order line items.
#[derive(Debug, Clone)]
pub struct OrderLedger {
    pool: SqlitePool,
}

impl OrderLedger {
    /// Creates a new OrderLedger.
    pub fn new(pool: SqlitePool) -> Self {
        OrderLedger { pool }
    }

    // =========================================================================
    // Transaction-Scoped Writes
    // =========================================================================

    /// Creates a new order in `processing` status.
    pub async fn create_order(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> DbResult<Order> {
        let order = Order {
            id: new_id(),
            user_id: user_id.to_string(),
            status: OrderStatus::Processing,
            placed_at: Utc::now(),
        };

        debug!(order_id = %order.id, user_id = %user_id, "Creating order");

        sqlx::query(
            "INSERT INTO orders (id, user_id, status, placed_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.status)
        .bind(order.placed_at)
        .execute(conn)
        .await?;

        Ok(order)
    }

    /// Appends a line item to an order, snapshotting the product's prices.
    ///
    /// The prices are copied from the product row as it stands inside the
    /// caller's transaction; later catalog edits never touch them.
    pub async fn add_item(
        &self,
        conn: &mut SqliteConnection,
        order_id: &str,
        line_no: i64,
        product: &Product,
        quantity: i64,
    ) -> DbResult<OrderItem> {
        let item = OrderItem {
            id: new_id(),
            order_id: order_id.to_string(),
            product_id: product.id.clone(),
            line_no,
            quantity,
            purchase_price_cents: product.retail_price_cents,
            wholesale_price_cents: product.wholesale_price_cents,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO order_items (
                id, order_id, product_id, line_no, quantity,
                purchase_price_cents, wholesale_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.order_id)
        .bind(&item.product_id)
        .bind(item.line_no)
        .bind(item.quantity)
        .bind(item.purchase_price_cents)
        .bind(item.wholesale_price_cents)
        .bind(item.created_at)
        .execute(conn)
        .await?;

        Ok(item)
    }

    /// Deletes an order; its line items go with it (ON DELETE CASCADE).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such order
    pub async fn delete_order(&self, conn: &mut SqliteConnection, order_id: &str) -> DbResult<()> {
        debug!(order_id = %order_id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(order_id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }

    /// Moves an order to `new_status`, enforcing the transition table.
    ///
    /// The UPDATE re-checks the observed previous status, so a transition
    /// fires at most once even when two requests race on the same order.
    ///
    /// ## Returns
    /// * `Ok(previous)` - The status the order held before this call
    /// * `Err(WorkflowError::OrderNotFound)` - No such order
    /// * `Err(WorkflowError::InvalidTransition)` - Transition table says no
    pub async fn set_status(
        &self,
        conn: &mut SqliteConnection,
        order_id: &str,
        new_status: OrderStatus,
    ) -> WorkflowResult<OrderStatus> {
        let previous: Option<OrderStatus> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
                .bind(order_id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?;

        let previous = previous.ok_or_else(|| WorkflowError::OrderNotFound(order_id.to_string()))?;

        OrderStatus::validate_transition(previous, new_status)?;

        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1 AND status = ?3")
            .bind(order_id)
            .bind(new_status)
            .bind(previous)
            .execute(conn)
            .await
            .map_err(DbError::from)?;

        // Lost race: another transaction moved the status between our read
        // and our write. Abort rather than guess.
        if result.rows_affected() == 0 {
            return Err(WorkflowError::Db(DbError::TransactionFailed(format!(
                "concurrent status change on order {order_id}"
            ))));
        }

        debug!(
            order_id = %order_id,
            from = %previous,
            to = %new_status,
            "Order status changed"
        );

        Ok(previous)
    }

    /// Gets an order by ID inside an open transaction.
    ///
    /// The workflow engine needs the owner and status under the same
    /// transaction that will mutate them.
    pub async fn fetch(
        &self,
        conn: &mut SqliteConnection,
        order_id: &str,
    ) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(order_id)
        .fetch_optional(conn)
        .await?;

        Ok(order)
    }

    /// Lists an order's items inside an open transaction.
    ///
    /// The cancellation workflow reads these to know what to restock.
    pub async fn items_in(
        &self,
        conn: &mut SqliteConnection,
        order_id: &str,
    ) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ?1 ORDER BY line_no"
        ))
        .bind(order_id)
        .fetch_all(conn)
        .await?;

        Ok(items)
    }

    // =========================================================================
    // Pool-Scoped Reads
    // =========================================================================

    /// Gets an order by its ID.
    pub async fn get_by_id(&self, order_id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Lists an order's items in line number order.
    pub async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ?1 ORDER BY line_no"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY placed_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists the most recent orders across all users.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY placed_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use shopfront_core::OrderStatus;

    use crate::error::WorkflowError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_user(db: &Database, username: &str) -> String {
        let user = db
            .users()
            .create(username, &format!("{username}@example.com"), shopfront_core::Role::Customer)
            .await
            .unwrap();
        user.id
    }

    #[tokio::test]
    async fn test_create_order_starts_processing() {
        let db = test_db().await;
        let user_id = seed_user(&db, "alice").await;

        let mut tx = db.pool().begin().await.unwrap();
        let order = db.orders().create_order(&mut tx, &user_id).await.unwrap();
        tx.commit().await.unwrap();

        let fetched = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Processing);
        assert_eq!(fetched.user_id, user_id);
    }

    #[tokio::test]
    async fn test_items_keep_line_order_and_snapshots() {
        let db = test_db().await;
        let user_id = seed_user(&db, "alice").await;
        let cheap = db.products().create("Cheap", None, 100, 60, 10).await.unwrap();
        let dear = db.products().create("Dear", None, 900, 500, 10).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let order = db.orders().create_order(&mut tx, &user_id).await.unwrap();
        db.orders().add_item(&mut tx, &order.id, 1, &dear, 2).await.unwrap();
        db.orders().add_item(&mut tx, &order.id, 2, &cheap, 1).await.unwrap();
        tx.commit().await.unwrap();

        let items = db.orders().items(&order.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_no, 1);
        assert_eq!(items[0].purchase_price_cents, 900);
        assert_eq!(items[1].line_no, 2);
        assert_eq!(items[1].purchase_price_cents, 100);
    }

    #[tokio::test]
    async fn test_delete_order_cascades_items() {
        let db = test_db().await;
        let user_id = seed_user(&db, "alice").await;
        let product = db.products().create("Widget", None, 500, 300, 10).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let order = db.orders().create_order(&mut tx, &user_id).await.unwrap();
        db.orders().add_item(&mut tx, &order.id, 1, &product, 2).await.unwrap();
        db.orders().delete_order(&mut tx, &order.id).await.unwrap();
        tx.commit().await.unwrap();

        assert!(db.orders().get_by_id(&order.id).await.unwrap().is_none());
        assert!(db.orders().items(&order.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_status_returns_previous() {
        let db = test_db().await;
        let user_id = seed_user(&db, "alice").await;

        let mut tx = db.pool().begin().await.unwrap();
        let order = db.orders().create_order(&mut tx, &user_id).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let previous = db
            .orders()
            .set_status(&mut tx, &order.id, OrderStatus::Completed)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(previous, OrderStatus::Processing);
        let fetched = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_terminal_status_rejects_further_transitions() {
        let db = test_db().await;
        let user_id = seed_user(&db, "alice").await;

        let mut tx = db.pool().begin().await.unwrap();
        let order = db.orders().create_order(&mut tx, &user_id).await.unwrap();
        db.orders()
            .set_status(&mut tx, &order.id, OrderStatus::Canceled)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let err = db
            .orders()
            .set_status(&mut tx, &order.id, OrderStatus::Completed)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_set_status_on_missing_order() {
        let db = test_db().await;

        let mut tx = db.pool().begin().await.unwrap();
        let err = db
            .orders()
            .set_status(&mut tx, "ghost", OrderStatus::Completed)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::OrderNotFound(id) if id == "ghost"));
    }
}
