//! # Checkout Engine
//!
//! Converts an accumulated cart into a finalized transaction.
//!
//! ## Finalize Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Finalize (one call)                              │
//! │                                                                         │
//! │  load cart lines ──► empty? ──► EmptyCart                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  grand_total = Σ line.price      (server-side, never from client)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  settle(total, cash, discount) ──► Underpayment { shortfall }          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ─────────────────────────────────────────────────┐              │
//! │  │  reserve invoice (≤ 5 attempts, UNIQUE idx guards)   │              │
//! │  │  insert transaction row                              │              │
//! │  │  for each line:                                      │              │
//! │  │    insert detail row                                 │              │
//! │  │    insert profit row  (sell − buy) × qty             │              │
//! │  │    UPDATE products SET stock = stock − qty           │              │
//! │  │      WHERE id = ? AND stock >= qty   ◄─ atomic check │              │
//! │  │  delete cashier's cart lines                         │              │
//! │  COMMIT ────────────────────────────────────────────────┘              │
//! │                                                                         │
//! │  Any failure rolls the whole block back; the cart stays intact.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why the Conditional Decrement
//! The cart-time stock check is advisory: two cashiers can both pass it
//! before either commits. The `AND stock >= qty` guard makes the decrement
//! itself the arbiter, and the `CHECK(stock >= 0)` constraint backs it up.

use chrono::Utc;
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction as SqlxTransaction};
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::repository::new_id;
use kasir_core::checkout::{line_profit, settle};
use kasir_core::invoice::generate_invoice_code;
use kasir_core::validation::validate_amount;
use kasir_core::{CoreError, Customer, Transaction, MAX_INVOICE_ATTEMPTS};

// =============================================================================
// Request / Read Models
// =============================================================================

/// Input to [`CheckoutEngine::finalize`].
///
/// The cashier identity is explicit, like everywhere else in this crate.
/// Note what is absent: no totals, no line prices. Those are recomputed
/// from the ledger.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub cashier_id: String,
    /// Optional customer reference; walk-in sales pass `None`.
    pub customer_id: Option<String>,
    /// Cash tendered, whole rupiah.
    pub cash: i64,
    /// Discount applied at checkout, whole rupiah.
    pub discount: i64,
}

/// One detail line joined with its product, for receipt rendering.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DetailWithProduct {
    pub id: String,
    pub product_id: String,
    pub qty: i64,
    pub price: i64,
    pub product_barcode: String,
    pub product_title: String,
}

/// The assembled read model behind the print/lookup operation: the
/// transaction plus everything a receipt needs, fetched eagerly in
/// one call.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionWithDetails {
    pub transaction: Transaction,
    pub details: Vec<DetailWithProduct>,
    pub profit_total: i64,
    pub customer: Option<Customer>,
}

/// Cart line shape used internally by finalize: the ledger row joined
/// with the prices needed for details and profits.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutLine {
    product_id: String,
    qty: i64,
    price: i64,
    buy_price: i64,
    sell_price: i64,
    title: String,
}

// =============================================================================
// Engine
// =============================================================================

/// The checkout engine: finalize and invoice lookup.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    /// Creates a new CheckoutEngine.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Finalizes the cashier's cart into a transaction.
    ///
    /// ## Arguments
    /// * `req` - Cashier, optional customer, cash tendered and discount
    ///
    /// ## Returns
    /// The created transaction, invoice included.
    ///
    /// ## Errors
    /// * [`CoreError::EmptyCart`] - Nothing to finalize
    /// * [`CoreError::Underpayment`] - `cash + discount < grand_total`
    /// * [`CoreError::OutOfStock`] - A concurrent sale drained the stock
    /// * [`CoreError::DuplicateInvoice`] - Code reservation exhausted
    ///
    /// Every failure after BEGIN rolls the transaction back; the cart is
    /// left exactly as it was.
    pub async fn finalize(&self, req: CheckoutRequest) -> DbResult<Transaction> {
        validate_amount("cash", req.cash).map_err(CoreError::from)?;
        validate_amount("discount", req.discount).map_err(CoreError::from)?;

        debug!(cashier_id = %req.cashier_id, "Starting finalize");

        let lines = sqlx::query_as::<_, CheckoutLine>(
            r#"
            SELECT c.product_id, c.qty, c.price, p.buy_price, p.sell_price, p.title
            FROM carts c
            INNER JOIN products p ON p.id = c.product_id
            WHERE c.cashier_id = ?1
            ORDER BY c.created_at
            "#,
        )
        .bind(&req.cashier_id)
        .fetch_all(&self.pool)
        .await?;

        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let grand_total = kasir_core::checkout::grand_total(lines.iter().map(|l| &l.price));
        let change = settle(grand_total, req.cash, req.discount)?;

        let mut tx = self.pool.begin().await?;

        let now = Utc::now();
        let transaction = Transaction {
            id: new_id(),
            cashier_id: req.cashier_id.clone(),
            customer_id: req.customer_id.clone(),
            invoice: reserve_invoice(&mut tx).await?,
            cash: req.cash,
            change,
            discount: req.discount,
            grand_total,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, cashier_id, customer_id, invoice,
                cash, change, discount, grand_total, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.cashier_id)
        .bind(&transaction.customer_id)
        .bind(&transaction.invoice)
        .bind(transaction.cash)
        .bind(transaction.change)
        .bind(transaction.discount)
        .bind(transaction.grand_total)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO transaction_details (
                    id, transaction_id, product_id, qty, price, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(new_id())
            .bind(&transaction.id)
            .bind(&line.product_id)
            .bind(line.qty)
            .bind(line.price)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO profits (id, transaction_id, total, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(new_id())
            .bind(&transaction.id)
            .bind(line_profit(line.sell_price, line.buy_price, line.qty))
            .bind(now)
            .execute(&mut *tx)
            .await?;

            // The decrement only fires when stock still covers the
            // quantity. Zero rows affected means a concurrent sale won.
            let decremented = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?1, updated_at = ?2
                WHERE id = ?3 AND stock >= ?1
                "#,
            )
            .bind(line.qty)
            .bind(now)
            .bind(&line.product_id)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                let available: i64 =
                    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                        .bind(&line.product_id)
                        .fetch_one(&mut *tx)
                        .await?;

                warn!(
                    product_id = %line.product_id,
                    requested = line.qty,
                    available,
                    "Stock drained during finalize, rolling back"
                );

                tx.rollback().await?;
                return Err(CoreError::OutOfStock {
                    title: line.title.clone(),
                    available,
                    requested: line.qty,
                }
                .into());
            }
        }

        sqlx::query("DELETE FROM carts WHERE cashier_id = ?1")
            .bind(&req.cashier_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            invoice = %transaction.invoice,
            grand_total = transaction.grand_total,
            change = transaction.change,
            lines = lines.len(),
            "Checkout finalized"
        );

        Ok(transaction)
    }

    /// Fetches a transaction and everything a receipt needs by its
    /// invoice code.
    ///
    /// ## Returns
    /// * `Err(CoreError::TransactionNotFound)` - Unknown invoice
    pub async fn get_by_invoice(&self, invoice: &str) -> DbResult<TransactionWithDetails> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, cashier_id, customer_id, invoice,
                   cash, change, discount, grand_total, created_at
            FROM transactions
            WHERE invoice = ?1
            "#,
        )
        .bind(invoice)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::TransactionNotFound(invoice.to_string()))?;

        let details = sqlx::query_as::<_, DetailWithProduct>(
            r#"
            SELECT
                d.id,
                d.product_id,
                d.qty,
                d.price,
                p.barcode AS product_barcode,
                p.title AS product_title
            FROM transaction_details d
            INNER JOIN products p ON p.id = d.product_id
            WHERE d.transaction_id = ?1
            ORDER BY d.created_at, d.id
            "#,
        )
        .bind(&transaction.id)
        .fetch_all(&self.pool)
        .await?;

        let profit_total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0) FROM profits WHERE transaction_id = ?1",
        )
        .bind(&transaction.id)
        .fetch_one(&self.pool)
        .await?;

        let customer = match &transaction.customer_id {
            Some(customer_id) => {
                sqlx::query_as::<_, Customer>(
                    r#"
                    SELECT id, name, phone, address, created_at, updated_at
                    FROM customers
                    WHERE id = ?1
                    "#,
                )
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => None,
        };

        Ok(TransactionWithDetails {
            transaction,
            details,
            profit_total,
            customer,
        })
    }
}

/// Reserves a unique invoice code inside the open transaction.
///
/// Generates a candidate, checks for an existing row as a fast path, and
/// retries up to [`MAX_INVOICE_ATTEMPTS`] times. The existence check is
/// advisory only; the UNIQUE index on `transactions.invoice` remains the
/// authoritative guard when the subsequent insert runs.
async fn reserve_invoice(tx: &mut SqlxTransaction<'_, Sqlite>) -> DbResult<String> {
    for attempt in 1..=MAX_INVOICE_ATTEMPTS {
        let candidate = {
            let mut rng = rand::thread_rng();
            generate_invoice_code(&mut rng)
        };

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM transactions WHERE invoice = ?1)")
                .bind(&candidate)
                .fetch_one(&mut **tx)
                .await?;

        if !exists {
            return Ok(candidate);
        }

        warn!(attempt, "Invoice code collision, regenerating");
    }

    Err(CoreError::DuplicateInvoice {
        attempts: MAX_INVOICE_ATTEMPTS,
    }
    .into())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::ProductInput;
    use crate::DbError;
    use kasir_core::invoice::is_valid_invoice_code;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, barcode: &str, stock: i64) -> String {
        let cat = match db.categories().list().await.unwrap().into_iter().next() {
            Some(c) => c,
            None => db.categories().insert("Minuman", "").await.unwrap(),
        };
        db.products()
            .insert(ProductInput {
                barcode: barcode.to_string(),
                title: "Kopi Susu".to_string(),
                description: None,
                category_id: cat.id,
                buy_price: 3_000,
                sell_price: 5_000,
                stock,
            })
            .await
            .unwrap()
            .id
    }

    fn request(cashier: &str, cash: i64, discount: i64) -> CheckoutRequest {
        CheckoutRequest {
            cashier_id: cashier.to_string(),
            customer_id: None,
            cash,
            discount,
        }
    }

    #[tokio::test]
    async fn test_finalize_happy_path() {
        // stock 10, sell 5.000, qty 3, cash 20.000 -> change 5.000, stock 7
        let db = test_db().await;
        let product_id = seed_product(&db, "899001", 10).await;
        db.carts()
            .add_or_increment("cashier-1", &product_id, 3)
            .await
            .unwrap();

        let trx = db
            .checkout()
            .finalize(request("cashier-1", 20_000, 0))
            .await
            .unwrap();

        assert_eq!(trx.grand_total, 15_000);
        assert_eq!(trx.change, 5_000);
        assert!(is_valid_invoice_code(&trx.invoice));

        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 7);

        // cart is cleared
        assert!(db.carts().list_lines("cashier-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_finalize_records_details_and_profits() {
        let db = test_db().await;
        let product_id = seed_product(&db, "899001", 10).await;
        db.carts()
            .add_or_increment("cashier-1", &product_id, 3)
            .await
            .unwrap();

        let trx = db
            .checkout()
            .finalize(request("cashier-1", 15_000, 0))
            .await
            .unwrap();

        let full = db.checkout().get_by_invoice(&trx.invoice).await.unwrap();
        assert_eq!(full.details.len(), 1);
        assert_eq!(full.details[0].qty, 3);
        assert_eq!(full.details[0].price, 15_000);
        assert_eq!(full.details[0].product_title, "Kopi Susu");
        // (5.000 - 3.000) × 3
        assert_eq!(full.profit_total, 6_000);
        assert!(full.customer.is_none());
    }

    #[tokio::test]
    async fn test_finalize_attaches_customer() {
        let db = test_db().await;
        let product_id = seed_product(&db, "899001", 10).await;
        let customer = db
            .customers()
            .insert("Budi", "0812", "Jl. Merdeka")
            .await
            .unwrap();
        db.carts()
            .add_or_increment("cashier-1", &product_id, 1)
            .await
            .unwrap();

        let mut req = request("cashier-1", 5_000, 0);
        req.customer_id = Some(customer.id.clone());
        let trx = db.checkout().finalize(req).await.unwrap();

        let full = db.checkout().get_by_invoice(&trx.invoice).await.unwrap();
        assert_eq!(full.customer.unwrap().name, "Budi");
    }

    #[tokio::test]
    async fn test_exact_payment_gives_zero_change() {
        let db = test_db().await;
        let product_id = seed_product(&db, "899001", 10).await;
        db.carts()
            .add_or_increment("cashier-1", &product_id, 3)
            .await
            .unwrap();

        // discount counts toward coverage: 10.000 + 5.000 == 15.000
        let trx = db
            .checkout()
            .finalize(request("cashier-1", 10_000, 5_000))
            .await
            .unwrap();
        assert_eq!(trx.change, 0);
    }

    #[tokio::test]
    async fn test_one_unit_short_is_underpayment_and_rolls_back() {
        let db = test_db().await;
        let product_id = seed_product(&db, "899001", 10).await;
        db.carts()
            .add_or_increment("cashier-1", &product_id, 3)
            .await
            .unwrap();

        let err = db
            .checkout()
            .finalize(request("cashier-1", 14_999, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Underpayment { shortfall: 1 })
        ));

        // nothing persisted, cart intact, stock untouched
        assert_eq!(db.carts().list_lines("cashier-1").await.unwrap().len(), 1);
        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 10);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let db = test_db().await;
        let err = db
            .checkout()
            .finalize(request("cashier-1", 10_000, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_unknown_invoice_is_not_found() {
        let db = test_db().await;
        let err = db
            .checkout()
            .get_by_invoice("TRX-0000000000")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::TransactionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_multi_line_totals() {
        let db = test_db().await;
        let p1 = seed_product(&db, "899001", 10).await;
        let cat = db.categories().list().await.unwrap().remove(0);
        let p2 = db
            .products()
            .insert(ProductInput {
                barcode: "899002".to_string(),
                title: "Teh Botol".to_string(),
                description: None,
                category_id: cat.id,
                buy_price: 2_000,
                sell_price: 4_000,
                stock: 8,
            })
            .await
            .unwrap()
            .id;

        db.carts().add_or_increment("cashier-1", &p1, 2).await.unwrap();
        db.carts().add_or_increment("cashier-1", &p2, 3).await.unwrap();

        // 2×5.000 + 3×4.000 = 22.000
        let trx = db
            .checkout()
            .finalize(request("cashier-1", 25_000, 0))
            .await
            .unwrap();
        assert_eq!(trx.grand_total, 22_000);
        assert_eq!(trx.change, 3_000);

        let full = db.checkout().get_by_invoice(&trx.invoice).await.unwrap();
        assert_eq!(full.details.len(), 2);
        // (5.000−3.000)×2 + (4.000−2.000)×3 = 10.000
        assert_eq!(full.profit_total, 10_000);

        assert_eq!(
            db.products().get_by_id(&p2).await.unwrap().unwrap().stock,
            5
        );
    }

    #[tokio::test]
    async fn test_invoices_are_unique_across_finalizes() {
        let db = test_db().await;
        let product_id = seed_product(&db, "899001", 100).await;
        let mut seen = std::collections::HashSet::new();

        for _ in 0..10 {
            db.carts()
                .add_or_increment("cashier-1", &product_id, 1)
                .await
                .unwrap();
            let trx = db
                .checkout()
                .finalize(request("cashier-1", 5_000, 0))
                .await
                .unwrap();
            assert!(seen.insert(trx.invoice));
        }
    }

    #[tokio::test]
    async fn test_concurrent_finalize_never_oversells() {
        // File-backed DB so two pool connections see the same data.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkout.db");
        let db = Database::new(DbConfig::new(&path).max_connections(4))
            .await
            .unwrap();

        let product_id = seed_product(&db, "899001", 10).await;
        db.carts()
            .add_or_increment("cashier-1", &product_id, 7)
            .await
            .unwrap();
        db.carts()
            .add_or_increment("cashier-2", &product_id, 6)
            .await
            .unwrap();

        let checkout1 = db.checkout();
        let checkout2 = db.checkout();
        let (r1, r2) = tokio::join!(
            checkout1.finalize(request("cashier-1", 50_000, 0)),
            checkout2.finalize(request("cashier-2", 50_000, 0)),
        );

        // 7 + 6 > 10: at most one of the two can win
        let successes = [r1.is_ok(), r2.is_ok()].iter().filter(|s| **s).count();
        assert!(successes <= 1, "both checkouts succeeded on stock 10");

        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert!(product.stock >= 0);
        let mut sold = 0;
        if r1.is_ok() {
            sold += 7;
        }
        if r2.is_ok() {
            sold += 6;
        }
        assert_eq!(product.stock, 10 - sold);
    }
}
