//! # Order Workflow Engine
//!
//! Purchase, cancellation, and admin status updates, each as one
//! database transaction.
//!
//! ## Purchase
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  purchase(caller, lines)                                                │
//! │                                                                         │
//! │  validate lines (pure, no I/O)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  ├── INSERT order (processing)                                          │
//! │  ├── line 1: fetch product → reserve stock → INSERT item (snapshot)     │
//! │  ├── line 2: fetch product → reserve stock → INSERT item (snapshot)     │
//! │  ├── ...                                                                │
//! │  └── any failure? → `?` drops the transaction → ROLLBACK                │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  All-or-nothing: a failed third line undoes the order row and the       │
//! │  first two reservations. No partial orders ever become visible.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cancellation
//!
//! Canceled is reachable only from Processing, and the status flip uses a
//! compare-and-set UPDATE. Together those give exactly-once restocking:
//! two concurrent cancels of the same order race on the flip, the loser
//! aborts, and the restock loop runs in the winner's transaction only.
//!
//! ## Why This Works on SQLite
//!
//! SQLite serializes writers, so each of these transactions observes and
//! produces a consistent stock state. The conditional decrement in
//! [`InventoryStore::reserve`] is the belt to that suspender: even a
//! reordered schedule cannot take stock below zero.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{WorkflowError, WorkflowResult};
use crate::repository::inventory::InventoryStore;
use crate::repository::order::OrderLedger;
use crate::repository::product::ProductRepository;
use shopfront_core::{
    validation::validate_purchase, Caller, Money, Order, OrderItem, OrderStatus, PurchaseLine,
};

/// A successfully placed order with its line items.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl PlacedOrder {
    /// Total charged, summed over line snapshots.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// The order workflow engine.
///
/// Stateless besides the pool handle; cheap to clone. Each public method
/// is one atomic operation.
#[derive(Debug, Clone)]
pub struct OrderWorkflow {
    pool: SqlitePool,
    products: ProductRepository,
    inventory: InventoryStore,
    orders: OrderLedger,
}

impl OrderWorkflow {
    /// Creates a new OrderWorkflow.
    pub fn new(pool: SqlitePool) -> Self {
        OrderWorkflow {
            products: ProductRepository::new(pool.clone()),
            inventory: InventoryStore::new(pool.clone()),
            orders: OrderLedger::new(pool.clone()),
            pool,
        }
    }

    /// Places an order: reserves stock for every line and records the
    /// order with price snapshots, all in one transaction.
    ///
    /// Lines become items in request order, numbered from 1. The same
    /// product may appear on several lines; each line reserves
    /// independently.
    ///
    /// ## Errors
    /// * `Validation` - Empty request, non-positive quantity, oversize
    /// * `ProductNotFound` - A line names an unknown product
    /// * `InsufficientStock` - A line asks for more than is on hand
    ///
    /// On any error nothing is persisted.
    pub async fn purchase(
        &self,
        caller: &Caller,
        lines: &[PurchaseLine],
    ) -> WorkflowResult<PlacedOrder> {
        validate_purchase(lines)?;

        debug!(user_id = %caller.user_id, lines = lines.len(), "Placing order");

        let mut tx = self.pool.begin().await.map_err(crate::error::DbError::from)?;

        let order = self.orders.create_order(&mut tx, &caller.user_id).await?;

        let mut items = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let line_no = index as i64 + 1;

            let product = self
                .products
                .fetch(&mut tx, &line.product_id)
                .await?
                .ok_or_else(|| WorkflowError::ProductNotFound(line.product_id.clone()))?;

            self.inventory
                .reserve(&mut tx, &line.product_id, line.quantity)
                .await?;

            let item = self
                .orders
                .add_item(&mut tx, &order.id, line_no, &product, line.quantity)
                .await?;
            items.push(item);
        }

        tx.commit().await.map_err(crate::error::DbError::from)?;

        info!(
            order_id = %order.id,
            user_id = %caller.user_id,
            items = items.len(),
            "Order placed"
        );

        Ok(PlacedOrder { order, items })
    }

    /// Cancels an order and returns its stock, in one transaction.
    ///
    /// Allowed for the order's owner and for admins. Only orders still in
    /// Processing can be canceled; each recorded line item releases
    /// exactly the quantity it reserved, at most once.
    ///
    /// ## Errors
    /// * `OrderNotFound` - No such order
    /// * `Forbidden` - Caller is neither owner nor admin
    /// * `InvalidTransition` - Order already completed or canceled
    pub async fn cancel(&self, caller: &Caller, order_id: &str) -> WorkflowResult<Order> {
        debug!(user_id = %caller.user_id, order_id = %order_id, "Canceling order");

        let mut tx = self.pool.begin().await.map_err(crate::error::DbError::from)?;

        let order = self
            .orders
            .fetch(&mut tx, order_id)
            .await?
            .ok_or_else(|| WorkflowError::OrderNotFound(order_id.to_string()))?;

        if !caller.may_act_on(&order.user_id) {
            return Err(WorkflowError::Forbidden {
                user_id: caller.user_id.clone(),
                order_id: order_id.to_string(),
            });
        }

        self.orders
            .set_status(&mut tx, order_id, OrderStatus::Canceled)
            .await?;

        // The status flip above succeeds at most once per order, so this
        // loop cannot double-restock.
        let items = self.orders.items_in(&mut tx, order_id).await?;
        for item in &items {
            self.inventory
                .release(&mut tx, &item.product_id, item.quantity)
                .await?;
        }

        tx.commit().await.map_err(crate::error::DbError::from)?;

        info!(
            order_id = %order_id,
            user_id = %caller.user_id,
            restocked_lines = items.len(),
            "Order canceled"
        );

        Ok(Order {
            status: OrderStatus::Canceled,
            ..order
        })
    }

    /// Admin-only status change with the same transition rules.
    ///
    /// Completing an order keeps the stock sold; canceling it restocks,
    /// identical to [`Self::cancel`]. Re-asserting the current status is
    /// rejected like any other forbidden transition.
    ///
    /// ## Errors
    /// * `Forbidden` - Caller is not an admin
    /// * `OrderNotFound` / `InvalidTransition` - As for cancel
    pub async fn update_status(
        &self,
        caller: &Caller,
        order_id: &str,
        new_status: OrderStatus,
    ) -> WorkflowResult<Order> {
        if !caller.is_admin() {
            return Err(WorkflowError::Forbidden {
                user_id: caller.user_id.clone(),
                order_id: order_id.to_string(),
            });
        }

        debug!(order_id = %order_id, new_status = %new_status, "Admin status update");

        let mut tx = self.pool.begin().await.map_err(crate::error::DbError::from)?;

        let order = self
            .orders
            .fetch(&mut tx, order_id)
            .await?
            .ok_or_else(|| WorkflowError::OrderNotFound(order_id.to_string()))?;

        self.orders.set_status(&mut tx, order_id, new_status).await?;

        if new_status == OrderStatus::Canceled {
            let items = self.orders.items_in(&mut tx, order_id).await?;
            for item in &items {
                self.inventory
                    .release(&mut tx, &item.product_id, item.quantity)
                    .await?;
            }
        }

        tx.commit().await.map_err(crate::error::DbError::from)?;

        info!(order_id = %order_id, new_status = %new_status, "Order status updated");

        Ok(Order {
            status: new_status,
            ..order
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
