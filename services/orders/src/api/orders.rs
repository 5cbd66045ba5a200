//! Order API handlers.
//!
//! # Purpose
//! Implements order intake, listing, single fetch, status transitions and
//! deletion on top of the configured [`crate::store::OrderStore`].
//!
//! # Key invariants
//! - Intake runs before any store call; a rejected request persists nothing.
//! - A status update changes only `status`.
//! - Deleting an unknown id is answered like a successful delete.
use crate::api::error::{ApiError, api_internal, api_invalid_status, api_not_found};
use crate::api::types::{DELETED_MESSAGE, DeleteResponse, StatusUpdateRequest};
use crate::api::{body_rejection, id_rejection};
use crate::app::AppState;
use crate::model::{InvalidStatus, Order, OrderRequest, OrderStatus};
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "orders",
    responses(
        (status = 200, description = "All orders, newest first", body = [Order]),
        (status = 500, description = "Storage failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state
        .store
        .list_orders()
        .await
        .map_err(|err| api_internal("Failed to fetch orders", &err))?;
    Ok(Json(orders))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created with status Pending", body = Order),
        (status = 400, description = "Missing or invalid field", body = crate::api::types::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(request) = body.map_err(body_rejection)?;
    let new_order = state.menu.intake(&request)?;
    let created = state
        .store
        .create_order(new_order)
        .await
        .map_err(|err| api_internal("Failed to create order", &err))?;
    tracing::info!(
        order_id = created.id,
        registration = %created.registration,
        beverage = %created.beverage,
        quantity = created.quantity,
        "order created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "orders",
    params(
        ("id" = i64, Path, description = "Order identifier")
    ),
    responses(
        (status = 200, description = "Fetch order", body = Order),
        (status = 400, description = "Malformed id", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Order>, ApiError> {
    let Path(id) = id.map_err(id_rejection)?;
    match state.store.get_order(id).await {
        Ok(order) => Ok(Json(order)),
        Err(StoreError::NotFound(_)) => Err(api_not_found("Order not found")),
        Err(err) => Err(api_internal("Failed to fetch order", &err)),
    }
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    tag = "orders",
    params(
        ("id" = i64, Path, description = "Order identifier")
    ),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Invalid status or malformed request", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::api::types::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_order_status(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    let Path(id) = id.map_err(id_rejection)?;
    let Json(request) = body.map_err(body_rejection)?;
    let status: OrderStatus = request
        .status
        .ok_or_else(|| InvalidStatus(String::new()))
        .and_then(|value| value.parse())
        .map_err(|err| api_invalid_status(&err))?;
    match state.store.update_status(id, status).await {
        Ok(order) => {
            tracing::info!(order_id = id, %status, "order status updated");
            Ok(Json(order))
        }
        Err(StoreError::NotFound(_)) => Err(api_not_found("Order not found")),
        Err(err) => Err(api_internal("Failed to update order", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "orders",
    params(
        ("id" = i64, Path, description = "Order identifier")
    ),
    responses(
        (status = 200, description = "Order deleted (or already absent)", body = DeleteResponse),
        (status = 400, description = "Malformed id", body = crate::api::types::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id.map_err(id_rejection)?;
    let removed = state
        .store
        .delete_order(id)
        .await
        .map_err(|err| api_internal("Failed to delete order", &err))?;
    tracing::info!(order_id = id, removed, "order delete requested");
    Ok(Json(DeleteResponse {
        message: DELETED_MESSAGE.to_string(),
    }))
}
