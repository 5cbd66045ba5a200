//! Order service HTTP API.
//!
//! Route handler modules plus the extractor-rejection mapping they share.
pub mod error;
pub mod menu;
pub mod openapi;
pub mod orders;
pub mod system;
pub mod types;

use crate::api::error::{ApiError, api_validation_error};
use axum::extract::rejection::{JsonRejection, PathRejection};

pub(crate) fn body_rejection(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    api_validation_error("Invalid request body")
}

pub(crate) fn id_rejection(rejection: PathRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "rejected order id");
    api_validation_error("Invalid order id")
}
