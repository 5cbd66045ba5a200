//! Order service HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::model::Menu;
use crate::observability;
use crate::store::OrderStore;
use axum::Router;
use axum::routing::{get, patch};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore + Send + Sync>,
    pub menu: Menu,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route("/api/health", get(api::system::health))
        .route("/api/beverages", get(api::menu::list_beverages))
        .route(
            "/api/orders",
            get(api::orders::list_orders).post(api::orders::create_order),
        )
        .route(
            "/api/orders/:id",
            get(api::orders::get_order).delete(api::orders::delete_order),
        )
        .route(
            "/api/orders/:id/status",
            patch(api::orders::update_order_status),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .layer(trace_layer)
        .with_state(state)
}
