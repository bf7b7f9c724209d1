//! # Repository Module
//!
//! Repository pattern implementations for database access.
//!
//! ## The Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Pattern                                  │
//! │                                                                         │
//! │  HTTP handlers                Repositories              Database        │
//! │  ┌────────────┐              ┌─────────────┐           ┌─────────┐     │
//! │  │ add_to_cart│─────────────►│CartRepository────┐      │         │     │
//! │  ├────────────┤              ├─────────────┤    ├─────►│ SQLite  │     │
//! │  │ store      │─────────────►│CheckoutEngine────┤      │         │     │
//! │  ├────────────┤              ├─────────────┤    │      │         │     │
//! │  │ /sales     │─────────────►│ReportQueries─────┘      │         │     │
//! │  └────────────┘              └─────────────┘           └─────────┘     │
//! │                                                                         │
//! │  Handlers never write SQL. All queries live in this module.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod category;
pub mod checkout;
pub mod customer;
pub mod product;
pub mod report;

use uuid::Uuid;

/// Generates a new UUID v4 entity ID.
///
/// Every table keys on a UUID string; business identifiers (barcode,
/// invoice) are separate unique columns.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
