//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP API errors (in apps/server)                                      │
//! │  └── ApiError         - What the client sees (status + envelope)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, invoice, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// The expected, recoverable conditions of the checkout flow (out of stock,
/// underpayment, invoice collision) all live here so every layer can match
/// on them precisely.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found by id or barcode.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds the live stock level.
    ///
    /// Expected and recoverable: the caller surfaces a user-visible
    /// warning and nothing is mutated.
    #[error("Out of stock for {title}: available {available}, requested {requested}")]
    OutOfStock {
        title: String,
        available: i64,
        requested: i64,
    },

    /// Cart line cannot be found for the requesting cashier.
    #[error("Cart line not found: {0}")]
    CartLineNotFound(String),

    /// No transaction exists for the given invoice code.
    #[error("Transaction not found for invoice: {0}")]
    TransactionNotFound(String),

    /// Checkout was attempted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// `cash + discount` does not cover the grand total.
    ///
    /// Carries the shortfall so the caller can tell the cashier exactly
    /// how much is missing.
    #[error("Underpayment: -{}", Money::from_minor(*shortfall))]
    Underpayment { shortfall: i64 },

    /// Every generated invoice code collided with an existing one.
    ///
    /// Rare (random collision); retryable by resubmitting the request.
    #[error("Invoice already exists after {attempts} attempts. Please try again!")]
    DuplicateInvoice { attempts: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or positive.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., bad barcode characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Report date range with start after end.
    #[error("start_date must not be after end_date")]
    InvalidDateRange,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_stock_message() {
        let err = CoreError::OutOfStock {
            title: "Kopi Susu".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Out of stock for Kopi Susu: available 3, requested 5"
        );
    }

    #[test]
    fn test_underpayment_message_formats_money() {
        let err = CoreError::Underpayment { shortfall: 15_000 };
        assert_eq!(err.to_string(), "Underpayment: -Rp15.000");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::Negative {
            field: "discount".to_string(),
        };
        assert_eq!(err.to_string(), "discount must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "qty".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
