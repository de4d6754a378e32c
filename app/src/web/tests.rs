// stockflow_app/src/web/tests.rs

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web as actix_data, App};
use serde_json::{json, Value};
use std::sync::Arc;
use stockflow::MemoryStore;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::web::{configure_app_routes, json_config, path_config, query_config};

fn memory_state() -> AppState {
  let store = Arc::new(MemoryStore::new());
  AppState::from_stores(store.clone(), store, Arc::new(AppConfig::for_memory()))
}

macro_rules! app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(actix_data::Data::new($state.clone()))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .configure(configure_app_routes),
    )
    .await
  };
}

async fn body(resp: ServiceResponse) -> Value {
  test::read_body_json(resp).await
}

fn order_payload(product: &Value, quantity: i64, method: &str) -> Value {
  let price: f64 = product["price"].as_f64().unwrap();
  json!({
    "cart": [{
      "productId": product["id"],
      "title": product["title"],
      "unitPrice": price,
      "orderedQuantity": quantity,
      "category": product["category"],
    }],
    "paymentMethod": method,
    "totalAmount": price * quantity as f64,
    "user": Uuid::new_v4(),
    "customerName": "Grace",
  })
}

#[actix_web::test]
async fn health_reports_ok() {
  let state = memory_state();
  let app = app!(state);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body(resp).await["status"], "ok");
}

#[actix_web::test]
async fn cod_order_flow_reconciles_on_delivery() {
  let state = memory_state();
  let app = app!(state);

  let created = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/products")
      .set_json(json!({"title": "Table Lamp", "category": "lighting", "price": 25.0, "quantity": 5}))
      .to_request(),
  )
  .await;
  assert_eq!(created.status(), StatusCode::CREATED);
  let product = body(created).await["data"].clone();
  let product_id = product["id"].as_str().unwrap().to_string();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/orders")
      .set_json(order_payload(&product, 2, "COD"))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let placed = body(resp).await;
  assert_eq!(placed["success"], true);
  assert_eq!(placed["order"]["status"], "pending");
  assert_eq!(placed["order"]["paymentMethod"], "COD");
  assert!(placed["reconciliation"].is_null());
  let order_id = placed["order"]["id"].as_str().unwrap().to_string();

  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri(&format!("/api/v1/orders/{}/status", order_id))
      .set_json(json!({"status": "delivered"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let change = body(resp).await;
  assert_eq!(change["previousStatus"], "pending");
  assert_eq!(change["applied"], true);
  assert_eq!(change["reconciliation"]["lines"][0]["outcome"]["result"], "applied");

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri(&format!("/api/v1/products/{}", product_id))
      .to_request(),
  )
  .await;
  assert_eq!(body(resp).await["data"]["quantity"], 3);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri(&format!("/api/v1/orders/{}", order_id))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body(resp).await["status"], "delivered");
}

#[actix_web::test]
async fn card_order_reports_understocked_lines_but_is_created() {
  let state = memory_state();
  let app = app!(state);

  let product = body(
    test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/products")
        .set_json(json!({"title": "Vase", "price": 10.0, "quantity": 1}))
        .to_request(),
    )
    .await,
  )
  .await["data"]
    .clone();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/orders")
      .set_json(order_payload(&product, 3, "Card"))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let placed = body(resp).await;
  let line = &placed["reconciliation"]["lines"][0]["outcome"];
  assert_eq!(line["result"], "failed");
  assert_eq!(line["reason"], "insufficientStock");
  assert_eq!(line["available"], 1);
}

#[actix_web::test]
async fn invalid_transitions_and_unknown_orders() {
  let state = memory_state();
  let app = app!(state);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri(&format!("/api/v1/orders/{}", Uuid::new_v4()))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let err = body(resp).await;
  assert_eq!(err["success"], false);

  let product = body(
    test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/products")
        .set_json(json!({"title": "Bench", "price": 90.0, "quantity": 3}))
        .to_request(),
    )
    .await,
  )
  .await["data"]
    .clone();
  let placed = body(
    test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/orders")
        .set_json(order_payload(&product, 1, "COD"))
        .to_request(),
    )
    .await,
  )
  .await;
  let status_uri = format!("/api/v1/orders/{}/status", placed["order"]["id"].as_str().unwrap());

  let delivered = test::call_service(
    &app,
    test::TestRequest::put()
      .uri(&status_uri)
      .set_json(json!({"status": "delivered"}))
      .to_request(),
  )
  .await;
  assert_eq!(delivered.status(), StatusCode::OK);

  let cancel = test::call_service(
    &app,
    test::TestRequest::put()
      .uri(&status_uri)
      .set_json(json!({"status": "cancel"}))
      .to_request(),
  )
  .await;
  assert_eq!(cancel.status(), StatusCode::CONFLICT);

  let unknown_status = test::call_service(
    &app,
    test::TestRequest::put()
      .uri(&status_uri)
      .set_json(json!({"status": "shipped"}))
      .to_request(),
  )
  .await;
  assert_eq!(unknown_status.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn empty_cart_is_a_validation_error() {
  let state = memory_state();
  let app = app!(state);
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/orders")
      .set_json(json!({"cart": [], "paymentMethod": "Card", "totalAmount": 0, "user": Uuid::new_v4()}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(body(resp).await["error"], "Validation failed");
}

#[actix_web::test]
async fn restock_brings_product_back() {
  let state = memory_state();
  let app = app!(state);
  let product = body(
    test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/products")
        .set_json(json!({"title": "Candle", "price": 8.5, "quantity": 0}))
        .to_request(),
    )
    .await,
  )
  .await["data"]
    .clone();
  assert_eq!(product["status"], "out-of-stock");

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri(&format!("/api/v1/products/{}/inventory", product["id"].as_str().unwrap()))
      .set_json(json!({"quantity": 10, "operation": "add"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let restocked = body(resp).await;
  assert_eq!(restocked["data"]["quantity"], 10);
  assert_eq!(restocked["data"]["status"], "in-stock");
}

#[actix_web::test]
async fn list_orders_filters_by_status() {
  let state = memory_state();
  let app = app!(state);
  let product = body(
    test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/products")
        .set_json(json!({"title": "Frame", "price": 15.0, "quantity": 10}))
        .to_request(),
    )
    .await,
  )
  .await["data"]
    .clone();
  for method in ["COD", "Card"] {
    test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/orders")
        .set_json(order_payload(&product, 1, method))
        .to_request(),
    )
    .await;
  }

  let all = body(
    test::call_service(&app, test::TestRequest::get().uri("/api/v1/orders").to_request()).await,
  )
  .await;
  assert_eq!(all["data"].as_array().unwrap().len(), 2);

  let card = body(
    test::call_service(
      &app,
      test::TestRequest::get()
        .uri("/api/v1/orders?paymentMethod=Card")
        .to_request(),
    )
    .await,
  )
  .await;
  let card_orders = card["data"].as_array().unwrap();
  assert_eq!(card_orders.len(), 1);
  assert_eq!(card_orders[0]["paymentMethod"], "Card");

  let delivered = body(
    test::call_service(
      &app,
      test::TestRequest::get()
        .uri("/api/v1/orders?status=delivered")
        .to_request(),
    )
    .await,
  )
  .await;
  assert!(delivered["data"].as_array().unwrap().is_empty());

  let since_2000 = body(
    test::call_service(
      &app,
      test::TestRequest::get()
        .uri("/api/v1/orders?from=2000-01-01T00:00:00Z")
        .to_request(),
    )
    .await,
  )
  .await;
  assert_eq!(since_2000["data"].as_array().unwrap().len(), 2);

  let before_2000 = body(
    test::call_service(
      &app,
      test::TestRequest::get()
        .uri("/api/v1/orders?to=2000-01-01T00:00:00Z")
        .to_request(),
    )
    .await,
  )
  .await;
  assert!(before_2000["data"].as_array().unwrap().is_empty());

  let inverted = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/api/v1/orders?from=2001-01-01T00:00:00Z&to=2000-01-01T00:00:00Z")
      .to_request(),
  )
  .await;
  assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn analytics_endpoints_count_delivered_revenue_only() {
  let state = memory_state();
  let app = app!(state);
  let product = body(
    test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/products")
        .set_json(json!({"title": "Rug", "category": "home", "price": 50.0, "quantity": 20}))
        .to_request(),
    )
    .await,
  )
  .await["data"]
    .clone();

  let mut ids = Vec::new();
  for quantity in [1, 2] {
    let placed = body(
      test::call_service(
        &app,
        test::TestRequest::post()
          .uri("/api/v1/orders")
          .set_json(order_payload(&product, quantity, "COD"))
          .to_request(),
      )
      .await,
    )
    .await;
    ids.push(placed["order"]["id"].as_str().unwrap().to_string());
  }
  test::call_service(
    &app,
    test::TestRequest::put()
      .uri(&format!("/api/v1/orders/{}/status", ids[0]))
      .set_json(json!({"status": "delivered"}))
      .to_request(),
  )
  .await;

  let overview = body(
    test::call_service(
      &app,
      test::TestRequest::get()
        .uri("/api/v1/analytics/business-overview")
        .to_request(),
    )
    .await,
  )
  .await;
  assert_eq!(overview["success"], true);
  assert_eq!(overview["data"]["totalRevenue"].as_f64(), Some(50.0));
  assert_eq!(overview["data"]["totalOrders"], 2);
  assert_eq!(overview["data"]["monthlyRevenue"].as_array().unwrap().len(), 12);

  let sales = body(
    test::call_service(
      &app,
      test::TestRequest::get()
        .uri("/api/v1/analytics/sales-products")
        .to_request(),
    )
    .await,
  )
  .await;
  assert_eq!(sales["data"]["totalUnitsSold"], 1);
  assert_eq!(sales["data"]["totalGrossRevenue"].as_f64(), Some(20.0));

  let customers = body(
    test::call_service(
      &app,
      test::TestRequest::get()
        .uri("/api/v1/analytics/customer-insights?timeoutMs=1000")
        .to_request(),
    )
    .await,
  )
  .await;
  assert_eq!(customers["data"]["totalCustomers"], 2);

  let dashboard = body(
    test::call_service(
      &app,
      test::TestRequest::get()
        .uri("/api/v1/analytics/dashboard")
        .to_request(),
    )
    .await,
  )
  .await;
  assert_eq!(dashboard["data"]["businessOverview"]["status"], "ready");
  assert_eq!(dashboard["data"]["salesProducts"]["status"], "ready");
  assert_eq!(dashboard["data"]["customerInsights"]["status"], "ready");

  let bad_timeout = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/api/v1/analytics/sales-products?timeoutMs=0")
      .to_request(),
  )
  .await;
  assert_eq!(bad_timeout.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn payment_intent_returns_client_secret() {
  let state = memory_state();
  let app = app!(state);
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/payments/intent")
      .set_json(json!({"amount": 42.5}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let intent = body(resp).await;
  assert_eq!(intent["amount"], 4250);
  assert!(intent["clientSecret"].as_str().unwrap().contains("_secret_"));

  let refused = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/payments/intent")
      .set_json(json!({"amount": 0}))
      .to_request(),
  )
  .await;
  assert_eq!(refused.status(), StatusCode::PAYMENT_REQUIRED);
}
