//! # Profit Report Routes
//!
//! Per-line profit records filtered by an inclusive creation-date range.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ApiError;
use crate::response;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/profits/filter", get(filter))
}

#[derive(Debug, Deserialize)]
struct DateRangeQuery {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// Profit rows in `[start_date, end_date]` plus the summed total.
/// 422 when the range is inverted.
async fn filter(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, ApiError> {
    let report = state
        .db
        .reports()
        .profits_between(query.start_date, query.end_date)
        .await?;

    Ok(response::ok(report))
}
