//! # Application State and Extractors
//!
//! Shared state handed to every handler, plus the extractor that pulls
//! the cashier identity out of the request.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use kasir_db::Database;

use crate::error::ApiError;

/// Header carrying the cashier identity on cart/checkout routes.
///
/// Verifying the identity is the upstream access-control layer's job
/// (reverse proxy / gateway); this service only requires that it is
/// present and scopes all ledger operations to it.
pub const CASHIER_HEADER: &str = "x-cashier-id";

/// Shared application state. Cloned per request; the database handle is
/// a pool wrapper so the clone is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// The cashier identity, extracted from the `X-Cashier-Id` header.
///
/// ## Usage
/// ```rust,ignore
/// async fn add_to_cart(
///     CashierId(cashier_id): CashierId,
///     State(state): State<AppState>,
///     ...
/// ) -> Result<..., ApiError> { ... }
/// ```
///
/// Missing or empty header rejects the request with 401 before the
/// handler body runs.
#[derive(Debug, Clone)]
pub struct CashierId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CashierId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CASHIER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(ApiError::missing_cashier)?;

        Ok(CashierId(value.to_string()))
    }
}
