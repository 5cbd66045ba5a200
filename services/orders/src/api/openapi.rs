//! OpenAPI schema aggregation for the order API.
use crate::api::types::{
    DeleteResponse, ErrorResponse, HealthStatus, MenuResponse, StatusUpdateRequest,
};
use crate::api::{menu, orders, system};
use crate::model::{Order, OrderRequest, OrderStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "drinks2u-api",
        version = "v1",
        description = "Drinks2U beverage ordering HTTP API"
    ),
    paths(
        system::health,
        menu::list_beverages,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order_status,
        orders::delete_order
    ),
    components(schemas(
        Order,
        OrderStatus,
        OrderRequest,
        StatusUpdateRequest,
        DeleteResponse,
        MenuResponse,
        HealthStatus,
        ErrorResponse
    )),
    tags(
        (name = "system", description = "Health checks"),
        (name = "menu", description = "Beverage menu"),
        (name = "orders", description = "Order intake and administration")
    )
)]
pub struct ApiDoc;
