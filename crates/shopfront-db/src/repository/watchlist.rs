//! # Watchlist Repository
//!
//! Per-user product watchlists. A watchlist row is just the (user,
//! product) pair; the composite primary key makes adding idempotent to
//! detect, and both foreign keys cascade so deleting a user or product
//! cleans up its rows.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shopfront_core::Product;

/// Repository for user watchlists.
#[derive(Debug, Clone)]
pub struct WatchlistRepository {
    pool: SqlitePool,
}

impl WatchlistRepository {
    /// Creates a new WatchlistRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WatchlistRepository { pool }
    }

    /// Adds a product to a user's watchlist.
    ///
    /// ## Returns
    /// * `Ok(true)` - Added
    /// * `Ok(false)` - Was already on the list
    pub async fn add(&self, user_id: &str, product_id: &str) -> DbResult<bool> {
        debug!(user_id = %user_id, product_id = %product_id, "Adding watchlist entry");

        let result = sqlx::query(
            r#"
            INSERT INTO watchlist (user_id, product_id, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (user_id, product_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Removes a product from a user's watchlist.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - The pair was not on the list
    pub async fn remove(&self, user_id: &str, product_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM watchlist WHERE user_id = ?1 AND product_id = ?2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("WatchlistEntry", product_id));
        }

        Ok(())
    }

    /// Checks whether a product is on a user's watchlist.
    pub async fn contains(&self, user_id: &str, product_id: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM watchlist WHERE user_id = ?1 AND product_id = ?2",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Lists the in-stock products on a user's watchlist, newest addition
    /// first. Sold-out products stay on the list but are not shown until
    /// they restock.
    pub async fn products_for_user(&self, user_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.quantity,
                   p.retail_price_cents, p.wholesale_price_cents,
                   p.created_at, p.updated_at
            FROM watchlist w
            INNER JOIN products p ON p.id = w.product_id
            WHERE w.user_id = ?1 AND p.quantity > 0
            ORDER BY w.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use shopfront_core::Role;

    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let db = test_db().await;
        let user = db
            .users()
            .create("alice", "alice@example.com", Role::Customer)
            .await
            .unwrap();
        let product = db.products().create("Widget", None, 500, 300, 5).await.unwrap();

        assert!(db.watchlist().add(&user.id, &product.id).await.unwrap());
        assert!(!db.watchlist().add(&user.id, &product.id).await.unwrap());

        assert!(db.watchlist().contains(&user.id, &product.id).await.unwrap());
        let products = db.watchlist().products_for_user(&user.id).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Widget");
    }

    #[tokio::test]
    async fn test_sold_out_products_hidden_from_listing() {
        let db = test_db().await;
        let user = db
            .users()
            .create("alice", "alice@example.com", Role::Customer)
            .await
            .unwrap();
        let sold_out = db.products().create("Gone", None, 500, 300, 0).await.unwrap();
        db.watchlist().add(&user.id, &sold_out.id).await.unwrap();

        assert!(db.watchlist().products_for_user(&user.id).await.unwrap().is_empty());
        // Still on the list itself.
        assert!(db.watchlist().contains(&user.id, &sold_out.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_missing_entry() {
        let db = test_db().await;
        let user = db
            .users()
            .create("alice", "alice@example.com", Role::Customer)
            .await
            .unwrap();

        let err = db.watchlist().remove(&user.id, "ghost").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_product_rejected_by_foreign_key() {
        let db = test_db().await;
        let user = db
            .users()
            .create("alice", "alice@example.com", Role::Customer)
            .await
            .unwrap();

        let err = db.watchlist().add(&user.id, "ghost").await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
