//! # Transaction Routes
//!
//! The cashier flow: scan a barcode, build the cart, finalize, print.
//!
//! All routes here except `search-product` and `print` operate on the
//! requesting cashier's ledger, identified by the `X-Cashier-Id` header.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use kasir_core::CoreError;
use kasir_db::{CheckoutRequest, DbError};

use crate::error::ApiError;
use crate::response;
use crate::state::{AppState, CashierId};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(index))
        .route("/transactions/search-product", post(search_product))
        .route("/transactions/add-to-cart", post(add_to_cart))
        .route("/transactions/destroy-cart", post(destroy_cart))
        .route("/transactions/store", post(store))
        .route("/transactions/print", get(print))
}

// =============================================================================
// Request Payloads
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchProductRequest {
    barcode: String,
}

#[derive(Debug, Deserialize)]
struct AddToCartRequest {
    product_id: String,
    qty: i64,
}

#[derive(Debug, Deserialize)]
struct DestroyCartRequest {
    cart_id: String,
}

#[derive(Debug, Deserialize)]
struct StoreRequest {
    customer_id: Option<String>,
    cash: i64,
    discount: i64,
}

#[derive(Debug, Deserialize)]
struct PrintQuery {
    invoice: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// The cashier screen bootstrap: current cart lines with their summed
/// total, plus the customer list for the attach-customer dropdown.
async fn index(
    CashierId(cashier_id): CashierId,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let carts = state.db.carts().list_lines(&cashier_id).await?;
    let grand_total = state.db.carts().grand_total(&cashier_id).await?;
    let customers = state.db.customers().list().await?;

    Ok(response::ok(json!({
        "carts": carts,
        "grand_total": grand_total,
        "customers": customers,
    })))
}

/// Resolves a scanned barcode to a product.
///
/// Unknown barcodes answer 404 with `data: null` so the scan loop on the
/// cashier screen can distinguish "no such product" from a transport
/// failure without parsing a message.
async fn search_product(
    CashierId(_): CashierId,
    State(state): State<AppState>,
    Json(payload): Json<SearchProductRequest>,
) -> Result<Response, ApiError> {
    let product = state.db.products().get_by_barcode(&payload.barcode).await?;

    Ok(match product {
        Some(product) => response::ok(product),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "data": null })),
        )
            .into_response(),
    })
}

/// Adds a product to the cashier's cart (merging repeat adds).
///
/// Out-of-stock is an expected, recoverable condition: it answers 200
/// with `success: false` so the UI shows a warning instead of an error
/// page. Anything else propagates as a real HTTP error.
async fn add_to_cart(
    CashierId(cashier_id): CashierId,
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<Response, ApiError> {
    match state
        .db
        .carts()
        .add_or_increment(&cashier_id, &payload.product_id, payload.qty)
        .await
    {
        Ok(line) => Ok(response::ok(line)),
        Err(DbError::Domain(err @ CoreError::OutOfStock { .. })) => {
            Ok(response::warning(err.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Removes one line from the cashier's cart. 404 when the line does not
/// exist (or belongs to someone else).
async fn destroy_cart(
    CashierId(cashier_id): CashierId,
    State(state): State<AppState>,
    Json(payload): Json<DestroyCartRequest>,
) -> Result<Response, ApiError> {
    state
        .db
        .carts()
        .remove_line(&cashier_id, &payload.cart_id)
        .await?;

    Ok(response::ok(json!({ "removed": payload.cart_id })))
}

/// Finalizes the cart into a transaction.
///
/// 422 on underpayment or an empty cart, 500 only when invoice
/// reservation is exhausted.
async fn store(
    CashierId(cashier_id): CashierId,
    State(state): State<AppState>,
    Json(payload): Json<StoreRequest>,
) -> Result<Response, ApiError> {
    let transaction = state
        .db
        .checkout()
        .finalize(CheckoutRequest {
            cashier_id,
            customer_id: payload.customer_id,
            cash: payload.cash,
            discount: payload.discount,
        })
        .await?;

    Ok(response::created(transaction))
}

/// Receipt lookup by invoice code.
async fn print(
    State(state): State<AppState>,
    Query(query): Query<PrintQuery>,
) -> Result<Response, ApiError> {
    let full = state.db.checkout().get_by_invoice(&query.invoice).await?;
    Ok(response::ok(full))
}
