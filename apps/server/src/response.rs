//! # Response Envelope
//!
//! Every endpoint answers with the same JSON envelope:
//!
//! ```json
//! { "success": true,  "data": ... }
//! { "success": false, "message": "..." }
//! ```
//!
//! Failures that are HTTP errors go through `ApiError`; this module
//! covers the success side plus the one deliberate oddity of the cart
//! flow: the out-of-stock *warning*, delivered with HTTP 200 and
//! `success: false` because it is an expected condition for the cashier
//! screen, not a protocol failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

/// 200 with `{ "success": true, "data": ... }`.
pub fn ok<T: Serialize>(data: T) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

/// 201 with `{ "success": true, "data": ... }`.
pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": data })),
    )
        .into_response()
}

/// 200 with `{ "success": false, "message": ... }` — the flash-message
/// analogue used for recoverable cart warnings.
pub fn warning(message: impl Into<String>) -> Response {
    Json(json!({ "success": false, "message": message.into() })).into_response()
}
