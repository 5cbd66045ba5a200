//! Order persistence.
//!
//! # Purpose
//! Defines the [`OrderStore`] seam shared by the HTTP handlers and the CLI,
//! plus the backends behind it:
//! - [`memory::InMemoryStore`]: process-local maps, for tests and demos.
//! - [`sqlite::SqliteStore`]: the durable single-table backend.
//! - [`local::LocalStorageStore`]: one serialized array in a key-value blob
//!   file, for the local-only deployment.
//!
//! # Key invariants
//! - Ids are assigned by the store and never reused by it.
//! - Listing is newest first (descending id).
//! - Deleting an unknown id is not an error.
use crate::model::{NewOrder, Order, OrderStatus};
use async_trait::async_trait;
use thiserror::Error;

pub mod local;
pub mod memory;
pub mod sqlite;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders, newest first.
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    async fn get_order(&self, id: i64) -> StoreResult<Order>;
    /// Persist a validated order with a fresh id and `Pending` status.
    async fn create_order(&self, order: NewOrder) -> StoreResult<Order>;
    async fn update_status(&self, id: i64, status: OrderStatus) -> StoreResult<Order>;
    /// Returns whether a record was removed.
    async fn delete_order(&self, id: i64) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

pub(crate) fn record_change(op: &'static str, total: usize) {
    metrics::counter!("drinks2u_order_changes_total", "op" => op).increment(1);
    metrics::gauge!("drinks2u_orders_total").set(total as f64);
}
