//! # Customer Routes
//!
//! Back-office CRUD for customers.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::response;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list).post(create))
        .route("/customers/:id", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
struct CustomerPayload {
    name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    address: String,
}

async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let customers = state.db.customers().list().await?;
    Ok(response::ok(customers))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let customer = state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Customer not found: {id}")))?;

    Ok(response::ok(customer))
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CustomerPayload>,
) -> Result<Response, ApiError> {
    let customer = state
        .db
        .customers()
        .insert(&payload.name, &payload.phone, &payload.address)
        .await?;

    Ok(response::created(customer))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerPayload>,
) -> Result<Response, ApiError> {
    state
        .db
        .customers()
        .update(&id, &payload.name, &payload.phone, &payload.address)
        .await?;

    Ok(response::ok(json!({ "updated": id })))
}

async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state.db.customers().delete(&id).await?;
    Ok(response::ok(json!({ "deleted": id })))
}
