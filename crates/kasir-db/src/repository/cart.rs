//! # Cart Ledger Repository
//!
//! Per-cashier, in-progress line items awaiting checkout.
//!
//! ## Ledger Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Ledger                                     │
//! │                                                                         │
//! │  • One line per (cashier, product) — repeat adds merge quantities      │
//! │  • line_price = sell_price × qty, recomputed server-side every time    │
//! │  • Stock check is advisory here; the checkout engine re-verifies       │
//! │    with an atomic conditional decrement at finalize                    │
//! │  • Lines are owned exclusively by their cashier                        │
//! │                                                                         │
//! │  add (qty 2) ──► line { qty: 2, price: 10.000 }                        │
//! │  add (qty 3) ──► line { qty: 5, price: 25.000 }   (merged, not new)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use kasir_core::checkout::line_price;
use kasir_core::validation::validate_quantity;
use kasir_core::{CartLine, CoreError};

// =============================================================================
// Read Model
// =============================================================================

/// A cart line joined with the product it references, as shown on the
/// cashier screen.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLineWithProduct {
    pub id: String,
    pub cashier_id: String,
    pub product_id: String,
    pub qty: i64,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub product_barcode: String,
    pub product_title: String,
    pub product_sell_price: i64,
    pub product_stock: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the cart ledger.
///
/// Every method takes the cashier identity explicitly; there is no
/// ambient "current user" anywhere in this crate.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Adds a product to the cashier's cart, merging into the existing
    /// line when one exists for the same product.
    ///
    /// ## Stock Check
    /// The merged quantity (`existing + requested`) must not exceed the
    /// product's live stock. On violation nothing is mutated and
    /// [`CoreError::OutOfStock`] is returned — an expected, recoverable
    /// condition the caller turns into a user-visible warning.
    ///
    /// ## Returns
    /// The resulting cart line (created or merged).
    pub async fn add_or_increment(
        &self,
        cashier_id: &str,
        product_id: &str,
        qty: i64,
    ) -> DbResult<CartLine> {
        validate_quantity(qty).map_err(CoreError::from)?;

        debug!(cashier_id = %cashier_id, product_id = %product_id, qty = %qty, "Adding to cart");

        let product = sqlx::query_as::<_, kasir_core::Product>(
            r#"
            SELECT id, barcode, title, description, category_id,
                   buy_price, sell_price, stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let existing = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT id, cashier_id, product_id, qty, price, created_at, updated_at
            FROM carts
            WHERE cashier_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(cashier_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        let new_qty = existing.as_ref().map_or(0, |line| line.qty) + qty;

        if !product.can_fulfill(new_qty) {
            return Err(CoreError::OutOfStock {
                title: product.title,
                available: product.stock,
                requested: new_qty,
            }
            .into());
        }

        let new_price = line_price(product.sell_price, new_qty);
        let now = Utc::now();

        let line = match existing {
            Some(mut line) => {
                sqlx::query(
                    r#"
                    UPDATE carts
                    SET qty = ?2, price = ?3, updated_at = ?4
                    WHERE id = ?1
                    "#,
                )
                .bind(&line.id)
                .bind(new_qty)
                .bind(new_price)
                .bind(now)
                .execute(&self.pool)
                .await?;

                line.qty = new_qty;
                line.price = new_price;
                line.updated_at = now;
                line
            }
            None => {
                let line = CartLine {
                    id: new_id(),
                    cashier_id: cashier_id.to_string(),
                    product_id: product_id.to_string(),
                    qty: new_qty,
                    price: new_price,
                    created_at: now,
                    updated_at: now,
                };

                sqlx::query(
                    r#"
                    INSERT INTO carts (id, cashier_id, product_id, qty, price, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                )
                .bind(&line.id)
                .bind(&line.cashier_id)
                .bind(&line.product_id)
                .bind(line.qty)
                .bind(line.price)
                .bind(line.created_at)
                .bind(line.updated_at)
                .execute(&self.pool)
                .await?;

                line
            }
        };

        Ok(line)
    }

    /// Removes a single line from the cashier's cart.
    ///
    /// The cashier filter is part of the WHERE clause, so one cashier
    /// can never delete another's line.
    ///
    /// ## Returns
    /// * `Err(CoreError::CartLineNotFound)` - No such line for this cashier
    pub async fn remove_line(&self, cashier_id: &str, line_id: &str) -> DbResult<()> {
        debug!(cashier_id = %cashier_id, line_id = %line_id, "Removing cart line");

        let result = sqlx::query("DELETE FROM carts WHERE id = ?1 AND cashier_id = ?2")
            .bind(line_id)
            .bind(cashier_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::CartLineNotFound(line_id.to_string()).into());
        }

        Ok(())
    }

    /// Lists the cashier's cart lines, most recent first, each joined
    /// with its product.
    pub async fn list_lines(&self, cashier_id: &str) -> DbResult<Vec<CartLineWithProduct>> {
        let lines = sqlx::query_as::<_, CartLineWithProduct>(
            r#"
            SELECT
                c.id,
                c.cashier_id,
                c.product_id,
                c.qty,
                c.price,
                c.created_at,
                p.barcode AS product_barcode,
                p.title AS product_title,
                p.sell_price AS product_sell_price,
                p.stock AS product_stock
            FROM carts c
            INNER JOIN products p ON p.id = c.product_id
            WHERE c.cashier_id = ?1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(cashier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Sums the cashier's cart line prices: the authoritative grand total
    /// used at checkout. Client-supplied totals never enter the system.
    pub async fn grand_total(&self, cashier_id: &str) -> DbResult<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(price), 0) FROM carts WHERE cashier_id = ?1")
                .bind(cashier_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    /// Deletes every line for the cashier.
    ///
    /// Called by the checkout engine after a successful finalize (inside
    /// its transaction); exposed here for tests and diagnostics.
    pub async fn clear_all(&self, cashier_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM carts WHERE cashier_id = ?1")
            .bind(cashier_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
