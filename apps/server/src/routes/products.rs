//! # Product Routes
//!
//! Back-office CRUD for the product catalog. The list endpoint powers
//! the catalog screen's search box via the `q` parameter.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use kasir_db::repository::product::ProductInput;

use crate::error::ApiError;
use crate::response;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/:id", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    q: Option<String>,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    50
}

#[derive(Debug, Deserialize)]
struct ProductPayload {
    barcode: String,
    title: String,
    description: Option<String>,
    category_id: String,
    buy_price: i64,
    sell_price: i64,
    stock: i64,
}

impl From<ProductPayload> for ProductInput {
    fn from(p: ProductPayload) -> Self {
        ProductInput {
            barcode: p.barcode,
            title: p.title,
            description: p.description,
            category_id: p.category_id,
            buy_price: p.buy_price,
            sell_price: p.sell_price,
            stock: p.stock,
        }
    }
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let products = state
        .db
        .products()
        .list(query.q.as_deref(), query.limit)
        .await?;

    Ok(response::ok(products))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Product not found: {id}")))?;

    Ok(response::ok(product))
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<Response, ApiError> {
    let product = state.db.products().insert(payload.into()).await?;
    Ok(response::created(product))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Response, ApiError> {
    state.db.products().update(&id, payload.into()).await?;
    Ok(response::ok(json!({ "updated": id })))
}

async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state.db.products().delete(&id).await?;
    Ok(response::ok(json!({ "deleted": id })))
}
