#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use orders::app::{AppState, build_router};
use orders::config::SqliteConfig;
use orders::model::Menu;
use orders::store::OrderStore;
use orders::store::sqlite::SqliteStore;
use std::sync::Arc;

pub type TestApp = axum::routing::RouterIntoService<Body, ()>;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn app_with_store(store: Arc<dyn OrderStore + Send + Sync>) -> TestApp {
    build_router(AppState {
        store,
        menu: Menu::default(),
    })
    .into_service()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn sqlite_store(dir: &tempfile::TempDir) -> SqliteStore {
    SqliteStore::connect(&SqliteConfig {
        path: dir.path().join("drinks2u.db").to_string_lossy().to_string(),
        max_connections: 2,
        acquire_timeout_ms: 1000,
    })
    .await
    .expect("sqlite store")
}
