mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{TestApp, app_with_store, empty_request, read_json, sqlite_store};
use http_helpers::json_request;
use orders::model::{NewOrder, Order, OrderStatus};
use orders::store::local::LocalStorageStore;
use orders::store::memory::InMemoryStore;
use orders::store::{OrderStore, StoreError, StoreResult};
use std::sync::Arc;
use tower::ServiceExt;

async fn create(app: &TestApp, registration: &str, beverage: &str, quantity: i64) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            serde_json::json!({
                "registration": registration,
                "beverage": beverage,
                "quantity": quantity
            }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

async fn list(app: &TestApp) -> Vec<serde_json::Value> {
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/orders"))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response)
        .await
        .as_array()
        .expect("array")
        .clone()
}

async fn order_lifecycle(app: TestApp) {
    assert!(list(&app).await.is_empty());

    let first = create(&app, "123", "Water", 2).await;
    assert_eq!(first["registration"], "123");
    assert_eq!(first["beverage"], "Water");
    assert_eq!(first["quantity"], 2);
    assert_eq!(first["status"], "Pending");
    assert!(!first["timestamp"].as_str().expect("timestamp").is_empty());

    let second = create(&app, "45", "Pink Gin", 1).await;
    let third = create(&app, "7", "Beer", 6).await;
    let first_id = first["id"].as_i64().expect("id");
    let second_id = second["id"].as_i64().expect("id");
    let third_id = third["id"].as_i64().expect("id");
    assert!(first_id < second_id && second_id < third_id);

    let ids: Vec<i64> = list(&app)
        .await
        .iter()
        .map(|order| order["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![third_id, second_id, first_id]);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/orders/{first_id}/status"),
            serde_json::json!({ "status": "Ready" }),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    let mut expected = first.clone();
    expected["status"] = serde_json::json!("Ready");
    assert_eq!(updated, expected);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/orders/{first_id}/status"),
            serde_json::json!({ "status": "Delivered" }),
        ))
        .await
        .expect("patch invalid");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["error"], "Invalid status");
    assert_eq!(payload["code"], "invalid_status");

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/orders/{first_id}")))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, expected);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/orders/{second_id}")))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await["message"],
        "Order deleted successfully"
    );

    let before = list(&app).await;
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/orders/999999999999999"))
        .await
        .expect("delete missing");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(list(&app).await, before);
    assert_eq!(before.len(), 2);

    let fourth = create(&app, "8", "Gin", 1).await;
    assert!(fourth["id"].as_i64().expect("id") > third_id);
}

#[tokio::test]
async fn order_lifecycle_memory() {
    order_lifecycle(app_with_store(Arc::new(InMemoryStore::new()))).await;
}

#[tokio::test]
async fn order_lifecycle_sqlite() {
    let dir = tempfile::tempdir().expect("tempdir");
    order_lifecycle(app_with_store(Arc::new(sqlite_store(&dir).await))).await;
}

#[tokio::test]
async fn order_lifecycle_local_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStorageStore::open(dir.path().join("storage.json"));
    order_lifecycle(app_with_store(Arc::new(store))).await;
}

async fn rejected_orders_persist_nothing(app: TestApp) {
    let cases = [
        (serde_json::json!({ "beverage": "Water", "quantity": 1 }), "registration is required"),
        (serde_json::json!({ "registration": "", "beverage": "Water", "quantity": 1 }), "registration is required"),
        (serde_json::json!({ "registration": "12", "beverage": "", "quantity": 1 }), "beverage is required"),
        (serde_json::json!({ "registration": "12", "beverage": "Water", "quantity": 0 }), "quantity must be a positive integer"),
        (serde_json::json!({ "registration": "12", "beverage": "Water", "quantity": -2 }), "quantity must be a positive integer"),
        (serde_json::json!({ "registration": "12", "beverage": "Water" }), "quantity is required"),
    ];
    for (body, message) in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/orders", body.clone()))
            .await
            .expect("create");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let payload = read_json(response).await;
        assert_eq!(payload["error"], message, "{body}");
        assert_eq!(payload["code"], "validation_error");
    }
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn rejected_orders_persist_nothing_memory() {
    rejected_orders_persist_nothing(app_with_store(Arc::new(InMemoryStore::new()))).await;
}

#[tokio::test]
async fn rejected_orders_persist_nothing_sqlite() {
    let dir = tempfile::tempdir().expect("tempdir");
    rejected_orders_persist_nothing(app_with_store(Arc::new(sqlite_store(&dir).await))).await;
}

#[tokio::test]
async fn rejected_orders_persist_nothing_local_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");
    rejected_orders_persist_nothing(app_with_store(Arc::new(LocalStorageStore::open(path.clone())))).await;
    assert!(!path.exists(), "rejected intake must not write the blob");
}

#[tokio::test]
async fn health_reports_running() {
    let app = app_with_store(Arc::new(InMemoryStore::new()));
    let response = app
        .oneshot(empty_request("GET", "/api/health"))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        serde_json::json!({ "status": "ok", "message": "Drinks2U API is running" })
    );
}

struct FailingStore;

fn boom<T>() -> StoreResult<T> {
    Err(StoreError::Unexpected(anyhow::anyhow!("database is locked")))
}

#[async_trait]
impl OrderStore for FailingStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        boom()
    }
    async fn get_order(&self, _id: i64) -> StoreResult<Order> {
        boom()
    }
    async fn create_order(&self, _order: NewOrder) -> StoreResult<Order> {
        boom()
    }
    async fn update_status(&self, _id: i64, _status: OrderStatus) -> StoreResult<Order> {
        boom()
    }
    async fn delete_order(&self, _id: i64) -> StoreResult<bool> {
        boom()
    }
    async fn health_check(&self) -> StoreResult<()> {
        boom()
    }
    fn is_durable(&self) -> bool {
        false
    }
    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn storage_failures_return_generic_500s() {
    let app = app_with_store(Arc::new(FailingStore));
    let cases = [
        (empty_request("GET", "/api/orders"), "Failed to fetch orders"),
        (
            json_request(
                "POST",
                "/api/orders",
                serde_json::json!({ "registration": "1", "beverage": "Beer", "quantity": 1 }),
            ),
            "Failed to create order",
        ),
        (
            json_request(
                "PATCH",
                "/api/orders/1/status",
                serde_json::json!({ "status": "Ready" }),
            ),
            "Failed to update order",
        ),
        (empty_request("DELETE", "/api/orders/1"), "Failed to delete order"),
        (empty_request("GET", "/api/orders/1"), "Failed to fetch order"),
        (empty_request("GET", "/api/health"), "Storage unavailable"),
    ];
    for (request, message) in cases {
        let uri = request.uri().to_string();
        let response = app.clone().oneshot(request).await.expect("request");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let payload = read_json(response).await;
        assert_eq!(payload["error"], message, "{uri}");
        assert_eq!(payload["code"], "internal");
        assert!(!payload.to_string().contains("database is locked"));
    }
}

#[tokio::test]
async fn invalid_order_is_rejected_before_touching_storage() {
    let app = app_with_store(Arc::new(FailingStore));
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/orders",
            serde_json::json!({ "registration": "1", "beverage": "Beer" }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
