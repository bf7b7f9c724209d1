//! # Route Modules
//!
//! ## Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /health                         liveness + DB ping                │
//! │                                                                         │
//! │  POST /transactions/search-product    product by barcode (scan)         │
//! │  GET  /transactions                   cart lines + total + customers    │
//! │  POST /transactions/add-to-cart       AddOrIncrement                    │
//! │  POST /transactions/destroy-cart      RemoveLine                        │
//! │  POST /transactions/store             Finalize                          │
//! │  GET  /transactions/print?invoice=    receipt read model                │
//! │                                                                         │
//! │  GET  /sales/filter?start_date&end_date                                 │
//! │  GET  /profits/filter?start_date&end_date                               │
//! │                                                                         │
//! │  /categories, /products, /customers   catalog CRUD                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod categories;
pub mod customers;
pub mod products;
pub mod profits;
pub mod sales;
pub mod transactions;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assembles the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(transactions::routes())
        .merge(sales::routes())
        .merge(profits::routes())
        .merge(categories::routes())
        .merge(products::routes())
        .merge(customers::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: answers 200 only when the database responds.
async fn health(State(state): State<AppState>) -> (StatusCode, axum::Json<serde_json::Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, axum::Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "status": "degraded" })),
        )
    }
}
