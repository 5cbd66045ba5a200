//! HTTP API request/response types.
//!
//! # Purpose
//! Payload shapes for the order REST API that are not model types themselves,
//! shared with the OpenAPI document and the HTTP client.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const HEALTH_MESSAGE: &str = "Drinks2U API is running";
pub const DELETED_MESSAGE: &str = "Order deleted successfully";

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct MenuResponse {
    pub items: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct DeleteResponse {
    pub message: String,
}

/// Target status for `PATCH /api/orders/{id}/status`.
///
/// Kept as a raw string so an unknown label is answered with `invalid_status`
/// rather than a body parse failure.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}
