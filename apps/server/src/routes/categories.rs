//! # Category Routes
//!
//! Back-office CRUD for product categories.

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
        .route("/categories", get(list).post(create))
        .route("/categories/:id", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
struct CategoryPayload {
    name: String,
    #[serde(default)]
    description: String,
}

async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let categories = state.db.categories().list().await?;
    Ok(response::ok(categories))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let category = state
        .db
        .categories()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {id}")))?;

    Ok(response::ok(category))
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Response, ApiError> {
    let category = state
        .db
        .categories()
        .insert(&payload.name, &payload.description)
        .await?;

    Ok(response::created(category))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Response, ApiError> {
    state
        .db
        .categories()
        .update(&id, &payload.name, &payload.description)
        .await?;

    Ok(response::ok(json!({ "updated": id })))
}

async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state.db.categories().delete(&id).await?;
    Ok(response::ok(json!({ "deleted": id })))
}
