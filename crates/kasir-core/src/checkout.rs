//! # Checkout Math
//!
//! Pure settlement arithmetic for the checkout flow.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Settlement                             │
//! │                                                                         │
//! │   cart lines        grand_total = Σ line.price   (server-side sum)     │
//! │       │                      │                                          │
//! │       ▼                      ▼                                          │
//! │   cash + discount  ─────►  covered?                                     │
//! │                              │                                          │
//! │             no ◄─────────────┴─────────────► yes                        │
//! │              │                                │                         │
//! │              ▼                                ▼                         │
//! │   Underpayment { shortfall }     change = cash + discount − total       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: the caller (the checkout engine in
//! kasir-db) fetches rows and hands plain integers in. Nothing in this
//! module touches the database.

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Line Calculations
// =============================================================================

/// Computes the price of a cart line: `sell_price × qty`.
///
/// The result is stored on the cart row and re-derived on every mutation,
/// so client-supplied prices never enter the ledger.
///
/// ## Example
/// ```rust
/// use kasir_core::checkout::line_price;
///
/// assert_eq!(line_price(5_000, 3), 15_000);
/// ```
#[inline]
pub const fn line_price(sell_price: i64, qty: i64) -> i64 {
    sell_price * qty
}

/// Computes the profit for one detail line: `(sell_price − buy_price) × qty`.
///
/// One profit row is recorded per detail line at finalize time. Negative
/// margins (selling below cost) are recorded as-is, not clamped.
///
/// ## Example
/// ```rust
/// use kasir_core::checkout::line_profit;
///
/// assert_eq!(line_profit(5_000, 3_000, 3), 6_000);
/// ```
#[inline]
pub const fn line_profit(sell_price: i64, buy_price: i64, qty: i64) -> i64 {
    (sell_price - buy_price) * qty
}

/// Sums cart line prices into the authoritative grand total.
#[inline]
pub fn grand_total<'a, I>(line_prices: I) -> i64
where
    I: IntoIterator<Item = &'a i64>,
{
    line_prices.into_iter().sum()
}

// =============================================================================
// Settlement
// =============================================================================

/// Validates payment sufficiency and computes change.
///
/// Payment covers the sale when `cash + discount ≥ grand_total`. The
/// discount participates in sufficiency exactly like tendered cash.
///
/// ## Arguments
/// * `grand_total` - Authoritative sum of cart line prices
/// * `cash` - Cash tendered by the customer
/// * `discount` - Discount applied at checkout
///
/// ## Returns
/// The change to hand back (`cash + discount − grand_total`, ≥ 0), or
/// [`CoreError::Underpayment`] carrying the exact shortfall.
///
/// ## Example
/// ```rust
/// use kasir_core::checkout::settle;
///
/// // exact payment yields zero change
/// assert_eq!(settle(15_000, 10_000, 5_000).unwrap(), 0);
/// ```
pub fn settle(grand_total: i64, cash: i64, discount: i64) -> CoreResult<i64> {
    let covered = cash + discount;
    if covered < grand_total {
        return Err(CoreError::Underpayment {
            shortfall: grand_total - covered,
        });
    }
    Ok(covered - grand_total)
}

// =============================================================================
// Unit Tests
// =============================================================================
