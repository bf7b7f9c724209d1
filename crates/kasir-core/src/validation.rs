//! # Validation Module
//!
//! Input validation for business rules.
//!
//! These run before any database work so bad input is rejected with a
//! precise [`ValidationError`] instead of surfacing as a constraint
//! violation from SQLite.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Limits
// =============================================================================

/// Maximum length for product titles and customer/category names.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length for barcodes.
pub const MAX_BARCODE_LEN: usize = 64;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a cart line quantity: `1 ..= MAX_LINE_QUANTITY`.
pub fn validate_quantity(qty: i64) -> Result<(), ValidationError> {
    if qty < 1 || qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "qty".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a monetary amount (price, cash, discount): must not be negative.
pub fn validate_amount(field: &str, amount: i64) -> Result<(), ValidationError> {
    if amount < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a barcode: non-empty, bounded length, visible ASCII only.
pub fn validate_barcode(barcode: &str) -> Result<(), ValidationError> {
    let trimmed = barcode.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }
    if trimmed.len() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }
    if !trimmed.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only visible ASCII characters".to_string(),
        });
    }
    Ok(())
}

/// Validates a human-facing name field (product title, customer name,
/// category name): non-empty and bounded.
pub fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if value.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates a report date range: start must not come after end.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        return Err(ValidationError::InvalidDateRange);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
