//! In-memory implementation of the order store.
//!
//! # Purpose
//! Implements [`OrderStore`] with a `BTreeMap` guarded by
//! `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no files, no database)
//! - demos where durability is not required
//!
//! # Durability and consistency
//! - **Not durable**: all orders are lost on process restart.
//! - **Single-process consistency**: mutations take the write lock, reads
//!   take the read lock.
//! - Ids come from a counter kept under the same lock as the map, so an id is
//!   never handed out twice even after deletes.
use super::{OrderStore, StoreError, StoreResult, record_change};
use crate::model::{NewOrder, Order, OrderStatus};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct OrderTable {
    next_id: i64,
    /// Keyed by id so iteration order is creation order.
    orders: BTreeMap<i64, Order>,
}

pub struct InMemoryStore {
    table: Arc<RwLock<OrderTable>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(OrderTable {
                next_id: 1,
                orders: BTreeMap::new(),
            })),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self.table.read().await.orders.values().rev().cloned().collect())
    }

    async fn get_order(&self, id: i64) -> StoreResult<Order> {
        self.table
            .read()
            .await
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("order".into()))
    }

    async fn create_order(&self, order: NewOrder) -> StoreResult<Order> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;
        let order = order.into_order(id);
        table.orders.insert(id, order.clone());
        record_change("created", table.orders.len());
        Ok(order)
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> StoreResult<Order> {
        let mut table = self.table.write().await;
        let order = table
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("order".into()))?;
        order.status = status;
        let updated = order.clone();
        record_change("updated", table.orders.len());
        Ok(updated)
    }

    async fn delete_order(&self, id: i64) -> StoreResult<bool> {
        let mut table = self.table.write().await;
        let removed = table.orders.remove(&id).is_some();
        if removed {
            record_change("deleted", table.orders.len());
        }
        Ok(removed)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
