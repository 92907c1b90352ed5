//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! Stock mutation lives in [`crate::repository::inventory`], not here:
//! this repository manages the catalog (names, descriptions, prices) and
//! absolute stock writes made by admins, while the inventory store owns
//! the relative reserve/release arithmetic the workflow engine uses.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult, WorkflowResult};
use crate::repository::new_id;
use shopfront_core::{validation::validate_product_input, Product};

const PRODUCT_COLUMNS: &str = "id, name, description, quantity, \
     retail_price_cents, wholesale_price_cents, created_at, updated_at";

/// Repository for product catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.create("Widget", None, 1099, 750, 20).await?;
/// let found = repo.get_by_id(&product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates and inserts a new product.
    ///
    /// ## Arguments
    /// * `name` - Product name
    /// * `description` - Optional long description
    /// * `retail_price_cents` - Customer-facing price
    /// * `wholesale_price_cents` - Acquisition cost (admin-only data)
    /// * `quantity` - Initial stock on hand
    ///
    /// ## Errors
    /// * `Validation` - Blank name, negative price, negative stock
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        retail_price_cents: i64,
        wholesale_price_cents: i64,
        quantity: i64,
    ) -> WorkflowResult<Product> {
        validate_product_input(name, retail_price_cents, wholesale_price_cents, quantity)?;

        let now = Utc::now();
        let product = Product {
            id: new_id(),
            name: name.to_string(),
            description: description.map(str::to_string),
            quantity,
            retail_price_cents,
            wholesale_price_cents,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, quantity,
                retail_price_cents, wholesale_price_cents,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.retail_price_cents)
        .bind(product.wholesale_price_cents)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(product)
    }

    /// Updates an existing product's catalog fields and stock.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                quantity = ?4,
                retail_price_cents = ?5,
                wholesale_price_cents = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.retail_price_cents)
        .bind(product.wholesale_price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID inside an open transaction.
    ///
    /// Used by the workflow engine to snapshot prices after the stock
    /// reservation has already happened on the same connection.
    pub async fn fetch(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }

    /// Lists products with stock on hand, sorted by name.
    pub async fn list_available(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE quantity > 0 ORDER BY name LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists the whole catalog, sold-out products included.
    pub async fn list_all(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_product() {
        let db = test_db().await;
        let repo = db.products();

        let created = repo
            .create("Widget", Some("A widget"), 1099, 750, 20)
            .await
            .unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.quantity, 20);
        assert_eq!(fetched.retail_price_cents, 1099);
        assert_eq!(fetched.wholesale_price_cents, 750);
    }

    #[tokio::test]
    async fn test_get_missing_product_returns_none() {
        let db = test_db().await;
        let found = db.products().get_by_id("nope").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_available_skips_sold_out() {
        let db = test_db().await;
        let repo = db.products();

        repo.create("In stock", None, 500, 300, 3).await.unwrap();
        repo.create("Sold out", None, 500, 300, 0).await.unwrap();

        let available = repo.list_available(50).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "In stock");

        let all = repo.list_all(50).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_the_database() {
        let db = test_db().await;
        let repo = db.products();

        assert!(repo.create("", None, 100, 50, 1).await.is_err());
        assert!(repo.create("Widget", None, -1, 50, 1).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let db = test_db().await;
        let repo = db.products();

        let mut product = repo.create("Widget", None, 1099, 750, 5).await.unwrap();
        product.id = "ghost".to_string();

        let err = repo.update(&product).await.unwrap_err();
        assert!(matches!(err, crate::error::DbError::NotFound { .. }));
    }
}
