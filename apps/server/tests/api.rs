//! End-to-end tests for the HTTP surface.
//!
//! The router is driven directly with `tower::ServiceExt::oneshot`; no
//! TCP listener involved. Each test gets its own in-memory database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use kasir_db::{Database, DbConfig, ProductInput};
use kasir_server::routes;
use kasir_server::AppState;

const CASHIER: &str = "cashier-1";

struct TestApp {
    app: Router,
    db: Database,
}

async fn spawn_app() -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = routes::router(AppState::new(db.clone()));
    TestApp { app, db }
}

async fn seed_product(db: &Database, barcode: &str, stock: i64) -> String {
    let category = match db.categories().list().await.unwrap().into_iter().next() {
        Some(c) => c,
        None => db.categories().insert("Minuman", "").await.unwrap(),
    };
    db.products()
        .insert(ProductInput {
            barcode: barcode.to_string(),
            title: "Kopi Susu".to_string(),
            description: None,
            category_id: category.id,
            buy_price: 3_000,
            sell_price: 5_000,
            stock,
        })
        .await
        .unwrap()
        .id
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Cashier-Id", CASHIER)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("X-Cashier-Id", CASHIER)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_answers_ok() {
    let t = spawn_app().await;
    let response = t.app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Cashier identity
// =============================================================================

#[tokio::test]
async fn cart_routes_require_cashier_header() {
    let t = spawn_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/transactions")
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(false));
}

// =============================================================================
// Scan / search-product
// =============================================================================

#[tokio::test]
async fn search_product_finds_by_barcode() {
    let t = spawn_app().await;
    seed_product(&t.db, "899001", 10).await;

    let response = t
        .app
        .oneshot(post_json(
            "/transactions/search-product",
            json!({ "barcode": "899001" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["title"], json!("Kopi Susu"));
    assert_eq!(body["data"]["sell_price"], json!(5000));
}

#[tokio::test]
async fn search_product_unknown_barcode_is_404_with_null_data() {
    let t = spawn_app().await;

    let response = t
        .app
        .oneshot(post_json(
            "/transactions/search-product",
            json!({ "barcode": "000000" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"], Value::Null);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn add_to_cart_creates_line() {
    let t = spawn_app().await;
    let product_id = seed_product(&t.db, "899001", 10).await;

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/transactions/add-to-cart",
            json!({ "product_id": product_id, "qty": 3 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["qty"], json!(3));
    assert_eq!(body["data"]["price"], json!(15000));

    // the cart index reflects it
    let response = t.app.oneshot(get("/transactions")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["grand_total"], json!(15000));
    assert_eq!(body["data"]["carts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn out_of_stock_add_is_a_warning_not_an_error() {
    let t = spawn_app().await;
    let product_id = seed_product(&t.db, "899001", 5).await;

    let response = t
        .app
        .oneshot(post_json(
            "/transactions/add-to-cart",
            json!({ "product_id": product_id, "qty": 6 }),
        ))
        .await
        .unwrap();

    // flash-message analogue: HTTP 200, success false
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("Out of stock"));

    // nothing persisted
    assert!(t.db.carts().list_lines(CASHIER).await.unwrap().is_empty());
}

#[tokio::test]
async fn destroy_cart_unknown_line_is_404() {
    let t = spawn_app().await;

    let response = t
        .app
        .oneshot(post_json(
            "/transactions/destroy-cart",
            json!({ "cart_id": "no-such-line" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn store_finalizes_and_prints() {
    let t = spawn_app().await;
    let product_id = seed_product(&t.db, "899001", 10).await;
    t.db.carts()
        .add_or_increment(CASHIER, &product_id, 3)
        .await
        .unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/transactions/store",
            json!({ "cash": 20000, "discount": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["grand_total"], json!(15000));
    assert_eq!(body["data"]["change"], json!(5000));
    let invoice = body["data"]["invoice"].as_str().unwrap().to_string();
    assert!(invoice.starts_with("TRX-"));

    // receipt lookup round-trips
    let response = t
        .app
        .oneshot(get(&format!("/transactions/print?invoice={invoice}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["transaction"]["invoice"], json!(invoice));
    assert_eq!(body["data"]["details"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["profit_total"], json!(6000));
}

#[tokio::test]
async fn store_underpayment_is_422_with_shortfall_message() {
    let t = spawn_app().await;
    let product_id = seed_product(&t.db, "899001", 10).await;
    t.db.carts()
        .add_or_increment(CASHIER, &product_id, 3)
        .await
        .unwrap();

    let response = t
        .app
        .oneshot(post_json(
            "/transactions/store",
            json!({ "cash": 5000, "discount": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["message"], json!("Underpayment: -Rp10.000"));

    // cart untouched
    assert_eq!(t.db.carts().list_lines(CASHIER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn store_empty_cart_is_422() {
    let t = spawn_app().await;

    let response = t
        .app
        .oneshot(post_json(
            "/transactions/store",
            json!({ "cash": 20000, "discount": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn print_unknown_invoice_is_404() {
    let t = spawn_app().await;

    let response = t
        .app
        .oneshot(get("/transactions/print?invoice=TRX-0000000000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn sales_and_profit_filters_cover_today() {
    let t = spawn_app().await;
    let product_id = seed_product(&t.db, "899001", 10).await;
    t.db.carts()
        .add_or_increment(CASHIER, &product_id, 3)
        .await
        .unwrap();
    t.db.checkout()
        .finalize(kasir_db::CheckoutRequest {
            cashier_id: CASHIER.to_string(),
            customer_id: None,
            cash: 20_000,
            discount: 0,
        })
        .await
        .unwrap();

    let today = chrono::Utc::now().date_naive();

    let response = t
        .app
        .clone()
        .oneshot(get(&format!(
            "/sales/filter?start_date={today}&end_date={today}"
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["total"], json!(15000));

    let response = t
        .app
        .oneshot(get(&format!(
            "/profits/filter?start_date={today}&end_date={today}"
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["total"], json!(6000));
}

#[tokio::test]
async fn inverted_date_range_is_422() {
    let t = spawn_app().await;

    let response = t
        .app
        .oneshot(get("/sales/filter?start_date=2024-02-01&end_date=2024-01-01"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Catalog CRUD
// =============================================================================

#[tokio::test]
async fn category_crud_roundtrip() {
    let t = spawn_app().await;

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/categories",
            json!({ "name": "Minuman", "description": "Drinks" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = t
        .app
        .oneshot(get(&format!("/categories/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["name"], json!("Minuman"));
}

#[tokio::test]
async fn product_create_validates_payload() {
    let t = spawn_app().await;
    let category = t.db.categories().insert("Minuman", "").await.unwrap();

    let response = t
        .app
        .oneshot(post_json(
            "/products",
            json!({
                "barcode": "899001",
                "title": "",
                "category_id": category.id,
                "buy_price": 3000,
                "sell_price": 5000,
                "stock": 10
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
