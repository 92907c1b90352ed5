//! # Sales Reports
//!
//! Read-only aggregate queries over the order ledger.
//!
//! Storewide sales figures count **completed orders only**: processing
//! orders may still be canceled, and canceled orders already gave their
//! stock back. Per-user purchase history excludes only canceled orders,
//! since a processing order is still something the user bought. Profit
//! figures use the per-line snapshots, so catalog price edits never
//! rewrite history.

use sqlx::SqlitePool;

use crate::error::{DbResult, WorkflowError, WorkflowResult};

/// One row of a product sales ranking.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ProductSales {
    pub product_id: String,
    pub name: String,
    pub units_sold: i64,
    pub revenue_cents: i64,
}

/// Profit ranking entry, from snapshot prices.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ProductProfit {
    pub product_id: String,
    pub name: String,
    pub units_sold: i64,
    pub profit_cents: i64,
}

/// Read-only report queries.
#[derive(Debug, Clone)]
pub struct SalesReports {
    pool: SqlitePool,
}

impl SalesReports {
    /// Creates a new SalesReports handle.
    pub fn new(pool: SqlitePool) -> Self {
        SalesReports { pool }
    }

    /// Top selling products by units, completed orders only.
    pub async fn top_sold_products(&self, limit: u32) -> DbResult<Vec<ProductSales>> {
        let rows = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT i.product_id,
                   p.name,
                   SUM(i.quantity) AS units_sold,
                   SUM(i.quantity * i.purchase_price_cents) AS revenue_cents
            FROM order_items i
            INNER JOIN orders o ON o.id = i.order_id
            INNER JOIN products p ON p.id = i.product_id
            WHERE o.status = 'completed'
            GROUP BY i.product_id, p.name
            ORDER BY units_sold DESC, p.name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// The single most profitable product, by summed snapshot margin.
    ///
    /// ## Returns
    /// * `Err(WorkflowError::ProductNotFound)` - Nothing has sold yet
    pub async fn most_profitable_product(&self) -> WorkflowResult<ProductProfit> {
        let row = sqlx::query_as::<_, ProductProfit>(
            r#"
            SELECT i.product_id,
                   p.name,
                   SUM(i.quantity) AS units_sold,
                   SUM(i.quantity * (i.purchase_price_cents - i.wholesale_price_cents))
                       AS profit_cents
            FROM order_items i
            INNER JOIN orders o ON o.id = i.order_id
            INNER JOIN products p ON p.id = i.product_id
            WHERE o.status = 'completed'
            GROUP BY i.product_id, p.name
            ORDER BY profit_cents DESC, p.name
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::error::DbError::from)?;

        row.ok_or_else(|| WorkflowError::ProductNotFound("no completed sales".to_string()))
    }

    /// Total units sold across all completed orders.
    pub async fn total_items_sold(&self) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(i.quantity)
            FROM order_items i
            INNER JOIN orders o ON o.id = i.order_id
            WHERE o.status = 'completed'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    /// A user's most purchased products by units, canceled orders excluded.
    pub async fn top_purchased_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> DbResult<Vec<ProductSales>> {
        let rows = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT i.product_id,
                   p.name,
                   SUM(i.quantity) AS units_sold,
                   SUM(i.quantity * i.purchase_price_cents) AS revenue_cents
            FROM order_items i
            INNER JOIN orders o ON o.id = i.order_id
            INNER JOIN products p ON p.id = i.product_id
            WHERE o.status != 'canceled' AND o.user_id = ?1
            GROUP BY i.product_id, p.name
            ORDER BY units_sold DESC, p.name
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// A user's most recently purchased products, newest order first,
    /// canceled orders excluded.
    pub async fn recent_items_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> DbResult<Vec<ProductSales>> {
        let rows = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT i.product_id,
                   p.name,
                   i.quantity AS units_sold,
                   i.quantity * i.purchase_price_cents AS revenue_cents
            FROM order_items i
            INNER JOIN orders o ON o.id = i.order_id
            INNER JOIN products p ON p.id = i.product_id
            WHERE o.status != 'canceled' AND o.user_id = ?1
            ORDER BY o.placed_at DESC, i.line_no
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use shopfront_core::{Caller, OrderStatus, PurchaseLine, Role};

    use crate::error::WorkflowError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Seeds two customers, an admin, three products, and a mix of
    /// completed, processing, and canceled orders.
    async fn seed_sales(db: &Database) -> (Caller, Caller) {
        let alice = Caller::user(
            db.users()
                .create("alice", "alice@example.com", Role::Customer)
                .await
                .unwrap()
                .id,
        );
        let bob = Caller::user(
            db.users()
                .create("bob", "bob@example.com", Role::Customer)
                .await
                .unwrap()
                .id,
        );
        let staff = Caller::admin(
            db.users()
                .create("admin", "admin@example.com", Role::Admin)
                .await
                .unwrap()
                .id,
        );

        // Margins: widget 300/unit, gizmo 500/unit, gadget 100/unit.
        let widget = db.products().create("Widget", None, 1000, 700, 100).await.unwrap();
        let gizmo = db.products().create("Gizmo", None, 2000, 1500, 100).await.unwrap();
        let gadget = db.products().create("Gadget", None, 300, 200, 100).await.unwrap();

        // Completed: alice buys 5 widgets + 1 gizmo, bob buys 2 gizmos.
        let o1 = db
            .workflow()
            .purchase(
                &alice,
                &[PurchaseLine::new(&widget.id, 5), PurchaseLine::new(&gizmo.id, 1)],
            )
            .await
            .unwrap();
        let o2 = db
            .workflow()
            .purchase(&bob, &[PurchaseLine::new(&gizmo.id, 2)])
            .await
            .unwrap();
        for order_id in [&o1.order.id, &o2.order.id] {
            db.workflow()
                .update_status(&staff, order_id, OrderStatus::Completed)
                .await
                .unwrap();
        }

        // Still processing: must not count.
        db.workflow()
            .purchase(&alice, &[PurchaseLine::new(&gadget.id, 50)])
            .await
            .unwrap();

        // Canceled: must not count.
        let canceled = db
            .workflow()
            .purchase(&bob, &[PurchaseLine::new(&widget.id, 30)])
            .await
            .unwrap();
        db.workflow().cancel(&bob, &canceled.order.id).await.unwrap();

        (alice, bob)
    }

    #[tokio::test]
    async fn test_top_sold_counts_completed_only() {
        let db = test_db().await;
        seed_sales(&db).await;

        let top = db.reports().top_sold_products(10).await.unwrap();
        assert_eq!(top.len(), 2);

        assert_eq!(top[0].name, "Widget");
        assert_eq!(top[0].units_sold, 5);
        assert_eq!(top[0].revenue_cents, 5 * 1000);

        assert_eq!(top[1].name, "Gizmo");
        assert_eq!(top[1].units_sold, 3);
    }

    #[tokio::test]
    async fn test_most_profitable_uses_snapshot_margin() {
        let db = test_db().await;
        seed_sales(&db).await;

        // Widget: 5 * 300 = 1500. Gizmo: 3 * 500 = 1500. Tie broken by name.
        let best = db.reports().most_profitable_product().await.unwrap();
        assert_eq!(best.name, "Gizmo");
        assert_eq!(best.profit_cents, 1500);
    }

    #[tokio::test]
    async fn test_most_profitable_with_no_sales() {
        let db = test_db().await;
        let err = db.reports().most_profitable_product().await.unwrap_err();
        assert!(matches!(err, WorkflowError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_total_items_sold() {
        let db = test_db().await;
        seed_sales(&db).await;

        assert_eq!(db.reports().total_items_sold().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_total_items_sold_empty_db() {
        let db = test_db().await;
        assert_eq!(db.reports().total_items_sold().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_per_user_reports_are_scoped() {
        let db = test_db().await;
        let (alice, bob) = seed_sales(&db).await;

        // Alice's processing gadget order still counts as a purchase;
        // only cancellation removes history.
        let alice_top = db
            .reports()
            .top_purchased_for_user(&alice.user_id, 10)
            .await
            .unwrap();
        assert_eq!(alice_top[0].name, "Gadget");
        assert_eq!(alice_top[0].units_sold, 50);
        assert_eq!(alice_top[1].name, "Widget");
        assert_eq!(alice_top[1].units_sold, 5);

        // Bob's canceled widget order is gone from his history.
        let bob_recent = db
            .reports()
            .recent_items_for_user(&bob.user_id, 10)
            .await
            .unwrap();
        assert_eq!(bob_recent.len(), 1);
        assert_eq!(bob_recent[0].name, "Gizmo");
        assert_eq!(bob_recent[0].units_sold, 2);
    }
}
