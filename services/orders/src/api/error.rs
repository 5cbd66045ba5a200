//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error construction so every order endpoint answers with the
//! same `{"error": .., "code": ..}` body.
//!
//! # Key invariants and assumptions
//! - `error` is the human-readable message front-ends show as-is.
//! - `code` is stable and matches the status category.
//! - Storage failures log details server-side and return a generic message.
use crate::api::types::ErrorResponse;
use crate::model::{IntakeError, InvalidStatus};
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use orders::api::error::ApiError;
/// use orders::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::NOT_FOUND,
///     body: ErrorResponse {
///         error: "Order not found".to_string(),
///         code: "not_found".to_string(),
///     },
/// };
/// assert_eq!(err.body.code, "not_found");
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            error: message.to_string(),
            code: code.to_string(),
        },
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 400 error for client input that failed validation or was malformed.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Build a 400 error for a status outside the allowed set.
pub fn api_invalid_status(err: &InvalidStatus) -> ApiError {
    tracing::debug!(status = %err.0, "rejected order status");
    api_error(StatusCode::BAD_REQUEST, "invalid_status", &err.to_string())
}

/// Build a 500 Internal Server Error from a store error.
///
/// The store error is logged; the client only sees `message`.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "order storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        tracing::debug!(field = err.field(), error = %err, "rejected order");
        api_validation_error(&err.to_string())
    }
}
