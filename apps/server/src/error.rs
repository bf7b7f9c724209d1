//! # API Error Types
//!
//! The client-facing error layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError / DbError                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (this module) ← status code + stable error code + message    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HTTP response: { "success": false, "message": "..." }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Mapping
//! | Condition | Status |
//! |---|---|
//! | missing `X-Cashier-Id` | 401 |
//! | unknown product / cart line / invoice / entity | 404 |
//! | underpayment, empty cart, validation, constraint | 422 |
//! | duplicate invoice after retries, everything else | 500 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use kasir_core::CoreError;
use kasir_db::DbError;

// =============================================================================
// Error Codes
// =============================================================================

/// Stable, machine-readable error codes for API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingCashierHeader,
    NotFound,
    OutOfStock,
    Underpayment,
    EmptyCart,
    DuplicateInvoice,
    ValidationFailed,
    ConstraintViolation,
    Internal,
}

// =============================================================================
// Api Error
// =============================================================================

/// An error ready to be serialized into an HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    /// 401 for cart/checkout requests arriving without a cashier identity.
    pub fn missing_cashier() -> Self {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::MissingCashierHeader,
            "Missing X-Cashier-Id header",
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::ProductNotFound(_)
            | CoreError::CartLineNotFound(_)
            | CoreError::TransactionNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
            }
            CoreError::OutOfStock { .. } => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::OutOfStock,
                message,
            ),
            CoreError::Underpayment { .. } => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::Underpayment,
                message,
            ),
            CoreError::EmptyCart => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::EmptyCart,
                message,
            ),
            // Original wording preserved: the client is told to resubmit.
            CoreError::DuplicateInvoice { .. } => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DuplicateInvoice,
                "Invoice Already Exists. Please Try Again!",
            ),
            CoreError::Validation(_) => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::ValidationFailed,
                message,
            ),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => core.into(),
            DbError::NotFound { .. } => {
                ApiError::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, err.to_string())
            }
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::ConstraintViolation,
                err.to_string(),
            ),
            other => {
                // Connection, migration and query failures are not the
                // client's business; log the detail, return a generic 500.
                error!(error = %other, "Internal database error");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Internal,
                    "Internal server error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "code": self.code,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underpayment_maps_to_422() {
        let api: ApiError = CoreError::Underpayment { shortfall: 15_000 }.into();
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.message, "Underpayment: -Rp15.000");
    }

    #[test]
    fn test_duplicate_invoice_keeps_legacy_wording() {
        let api: ApiError = CoreError::DuplicateInvoice { attempts: 5 }.into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Invoice Already Exists. Please Try Again!");
    }

    #[test]
    fn test_domain_error_unwraps_through_db_layer() {
        let api: ApiError = DbError::Domain(CoreError::EmptyCart).into();
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.code, ErrorCode::EmptyCart);
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let api: ApiError = DbError::ConnectionFailed("secret path".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Internal server error");
    }
}
