//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  barcode (biz)  │   │  cashier_id     │   │  invoice (biz)  │       │
//! │  │  buy/sell price │   │  product_id     │   │  cash/discount  │       │
//! │  │  stock ≥ 0      │   │  qty, price     │   │  change, total  │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                        │ 1—*            │
//! │                               ┌────────────────────────┼─────────┐     │
//! │                               ▼                        ▼         │     │
//! │                     ┌──────────────────┐   ┌──────────────────┐  │     │
//! │                     │ TransactionDetail│   │      Profit      │  │     │
//! │                     │ product,qty,price│   │ (sell−buy)×qty   │  │     │
//! │                     └──────────────────┘   └──────────────────┘  │     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists: (barcode, invoice) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Catalog
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode - business identifier used for scan-to-add. Unique.
    pub barcode: String,

    /// Display name shown to the cashier and on the receipt.
    pub title: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// Category this product belongs to.
    pub category_id: String,

    /// Purchase price in minor units (for profit computation).
    pub buy_price: i64,

    /// Selling price in minor units. Authoritative for all line prices.
    pub sell_price: i64,

    /// Current stock level. Never negative.
    pub stock: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as a Money type.
    #[inline]
    pub fn sell_price(&self) -> Money {
        Money::from_minor(self.sell_price)
    }

    /// Returns the purchase price as a Money type.
    #[inline]
    pub fn buy_price(&self) -> Money {
        Money::from_minor(self.buy_price)
    }

    /// Checks whether the current stock covers the requested quantity.
    ///
    /// This is the advisory check used at cart-mutation time; the checkout
    /// engine re-verifies with an atomic conditional decrement at finalize.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// A customer that can be attached to a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cart Ledger
// =============================================================================

/// An in-progress line item awaiting checkout.
///
/// ## Ownership
/// A line belongs to exactly one cashier; no other identity may read or
/// mutate it. There is at most one line per (cashier, product) pair -
/// repeat adds increment the quantity instead of creating a new row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartLine {
    pub id: String,

    /// The cashier who owns this line. Always passed in explicitly by the
    /// caller - there is no ambient "current user" anywhere in the core.
    pub cashier_id: String,

    pub product_id: String,

    /// Quantity in the cart. Always ≥ 1.
    pub qty: i64,

    /// Line price in minor units: `sell_price × qty`, recomputed
    /// server-side on every mutation. Never taken from the client.
    pub price: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartLine {
    /// Returns the line price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price)
    }
}

// =============================================================================
// Finalized Transactions
// =============================================================================

/// A finalized checkout. Immutable once created - there is no update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub cashier_id: String,
    pub customer_id: Option<String>,

    /// Globally unique human-facing invoice code (`TRX-` + 10 chars).
    pub invoice: String,

    /// Cash tendered by the customer, in minor units.
    pub cash: i64,

    /// Change returned: `cash + discount − grand_total`.
    pub change: i64,

    /// Discount applied at checkout, in minor units.
    pub discount: i64,

    /// Authoritative sum of the cart line prices at checkout time.
    pub grand_total: i64,

    pub created_at: DateTime<Utc>,
}

/// One row per cart line at time of checkout; append-only child of
/// [`Transaction`]. Copies (product, qty, price) so the sale history is
/// preserved even if the product changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionDetail {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub qty: i64,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

/// Profit recorded per detail line: `(sell_price − buy_price) × qty`.
/// Append-only child of [`Transaction`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profit {
    pub id: String,
    pub transaction_id: String,
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        Product {
            id: "p1".to_string(),
            barcode: "899123".to_string(),
            title: "Kopi Susu".to_string(),
            description: None,
            category_id: "c1".to_string(),
            buy_price: 3_000,
            sell_price: 5_000,
            stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_fulfill() {
        let p = product(5);
        assert!(p.can_fulfill(5));
        assert!(!p.can_fulfill(6));
    }

    #[test]
    fn test_price_helpers() {
        let p = product(1);
        assert_eq!(p.sell_price().minor(), 5_000);
        assert_eq!(p.buy_price().minor(), 3_000);
    }
}
