//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Barcode lookup (the cashier's scan-to-add path)
//! - CRUD operations
//! - Title search for the back-office catalog screen
//!
//! Stock is NOT mutated here during checkout. The checkout engine owns
//! the atomic conditional decrement so it happens inside the same
//! transaction as the sale rows.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use kasir_core::validation::{validate_amount, validate_barcode, validate_name};
use kasir_core::{CoreError, Product};

/// Fields accepted when creating or updating a product.
///
/// Stock and prices arrive as plain integers; validation happens in
/// the repository before any SQL runs.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub barcode: String,
    pub title: String,
    pub description: Option<String>,
    pub category_id: String,
    pub buy_price: i64,
    pub sell_price: i64,
    pub stock: i64,
}

impl ProductInput {
    fn validate(&self) -> Result<(), CoreError> {
        validate_barcode(&self.barcode)?;
        validate_name("title", &self.title)?;
        validate_amount("buy_price", self.buy_price)?;
        validate_amount("sell_price", self.sell_price)?;
        validate_amount("stock", self.stock)?;
        Ok(())
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Scan-to-add lookup
/// let product = repo.get_by_barcode("8991234560017").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

const PRODUCT_COLUMNS: &str = r#"
    id, barcode, title, description, category_id,
    buy_price, sell_price, stock, created_at, updated_at
"#;

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its barcode.
    ///
    /// This is the hot path of the cashier screen: every scan resolves
    /// through this exact-match lookup (unique index on barcode).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        debug!(barcode = %barcode, "Looking up product by barcode");

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists products, newest first, optionally filtered by a title
    /// substring (the back-office catalog search box).
    pub async fn list(&self, title_filter: Option<&str>, limit: u32) -> DbResult<Vec<Product>> {
        let products = match title_filter.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let pattern = format!("%{q}%");
                let sql = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE title LIKE ?1 ORDER BY created_at DESC LIMIT ?2"
                );
                sqlx::query_as::<_, Product>(&sql)
                    .bind(pattern)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     ORDER BY created_at DESC LIMIT ?1"
                );
                sqlx::query_as::<_, Product>(&sql)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The created product
    /// * `Err(DbError::UniqueViolation)` - Barcode already exists
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown category
    pub async fn insert(&self, input: ProductInput) -> DbResult<Product> {
        input.validate()?;

        debug!(barcode = %input.barcode, title = %input.title, "Inserting product");

        let product = Product {
            id: new_id(),
            barcode: input.barcode,
            title: input.title,
            description: input.description,
            category_id: input.category_id,
            buy_price: input.buy_price,
            sell_price: input.sell_price,
            stock: input.stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO products (
                id, barcode, title, description, category_id,
                buy_price, sell_price, stock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.category_id)
        .bind(product.buy_price)
        .bind(product.sell_price)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, input: ProductInput) -> DbResult<()> {
        input.validate()?;

        debug!(id = %id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                barcode = ?2,
                title = ?3,
                description = ?4,
                category_id = ?5,
                buy_price = ?6,
                sell_price = ?7,
                stock = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.barcode)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category_id)
        .bind(input.buy_price)
        .bind(input.sell_price)
        .bind(input.stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Transaction details reference products with RESTRICT, so a product
    /// with sale history cannot be removed.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
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
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_category(db: &Database) -> String {
        db.categories().insert("Minuman", "").await.unwrap().id
    }

    fn input(category_id: &str, barcode: &str) -> ProductInput {
        ProductInput {
            barcode: barcode.to_string(),
            title: "Kopi Susu".to_string(),
            description: None,
            category_id: category_id.to_string(),
            buy_price: 3_000,
            sell_price: 5_000,
            stock: 10,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_barcode() {
        let db = test_db().await;
        let cat = seed_category(&db).await;

        let created = db.products().insert(input(&cat, "899001")).await.unwrap();

        let found = db
            .products()
            .get_by_barcode("899001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.sell_price, 5_000);
        assert_eq!(found.stock, 10);
    }

    #[tokio::test]
    async fn test_unknown_barcode_returns_none() {
        let db = test_db().await;
        assert!(db
            .products()
            .get_by_barcode("000000")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let db = test_db().await;
        let cat = seed_category(&db).await;

        db.products().insert(input(&cat, "899001")).await.unwrap();
        let err = db.products().insert(input(&cat, "899001")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let db = test_db().await;
        let err = db
            .products()
            .insert(input("no-such-category", "899002"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_with_title_filter() {
        let db = test_db().await;
        let cat = seed_category(&db).await;

        let mut teh = input(&cat, "899010");
        teh.title = "Teh Botol".to_string();
        db.products().insert(teh).await.unwrap();
        db.products().insert(input(&cat, "899011")).await.unwrap();

        let hits = db.products().list(Some("teh"), 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Teh Botol");

        let all = db.products().list(None, 20).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let cat = seed_category(&db).await;
        let created = db.products().insert(input(&cat, "899001")).await.unwrap();

        let mut changed = input(&cat, "899001");
        changed.sell_price = 6_000;
        db.products().update(&created.id, changed).await.unwrap();

        let fetched = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.sell_price, 6_000);

        db.products().delete(&created.id).await.unwrap();
        assert!(db.products().get_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let db = test_db().await;
        let cat = seed_category(&db).await;

        let mut bad = input(&cat, "899001");
        bad.sell_price = -1;
        let err = db.products().insert(bad).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));
    }
}
