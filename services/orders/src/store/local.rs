//! Key-value blob implementation of the order store.
//!
//! # Purpose
//! Backs the local-only deployment: no server, no database, just a JSON file
//! laid out like browser local storage (an object of key → value). Orders are
//! one array stored under [`ORDERS_KEY`]; other keys in the file are carried
//! through untouched.
//!
//! # Consistency
//! Every operation is a read-modify-write of the whole blob. A process-wide
//! mutex serializes those cycles, and writes go through a temp file plus
//! rename so a crash never leaves a half-written blob. Two processes writing
//! the same file still race; the last writer wins.
//!
//! # Ids
//! New ids are `max(now in epoch millis, highest id in the blob + 1)`, so they
//! grow with wall-clock time and stay strictly increasing within a blob.
use super::{OrderStore, StoreError, StoreResult, record_change};
use crate::model::{NewOrder, Order, OrderStatus};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

pub const ORDERS_KEY: &str = "drinks2u_orders";

pub struct LocalStorageStore {
    path: PathBuf,
    lock: Mutex<()>,
}

/// The decoded blob: every key, with the orders array lifted out.
struct Blob {
    entries: Map<String, Value>,
    orders: Vec<Order>,
}

impl LocalStorageStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<Blob> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Blob {
                    entries: Map::new(),
                    orders: Vec::new(),
                });
            }
            Err(err) => {
                return Err(StoreError::Unexpected(
                    anyhow::Error::new(err)
                        .context(format!("read local storage {}", self.path.display())),
                ));
            }
        };
        let mut entries: Map<String, Value> = if bytes.is_empty() {
            Map::new()
        } else {
            serde_json::from_slice(&bytes).context("parse local storage blob")?
        };
        let orders = match entries.remove(ORDERS_KEY) {
            Some(value) => serde_json::from_value(value).context("parse stored orders")?,
            None => Vec::new(),
        };
        Ok(Blob { entries, orders })
    }

    async fn save(&self, blob: Blob) -> StoreResult<()> {
        let Blob {
            mut entries,
            orders,
        } = blob;
        entries.insert(
            ORDERS_KEY.to_string(),
            serde_json::to_value(&orders).context("encode orders")?,
        );
        let bytes = serde_json::to_vec_pretty(&entries).context("encode local storage blob")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }
}

fn next_id(orders: &[Order]) -> StoreResult<i64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_millis()).ok())
        .unwrap_or(0);
    let last = orders.iter().map(|order| order.id).max().unwrap_or(0);
    let after_last = last
        .checked_add(1)
        .ok_or_else(|| StoreError::Unexpected(anyhow!("order id space exhausted after {last}")))?;
    Ok(now.max(after_last))
}

#[async_trait]
impl OrderStore for LocalStorageStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let _guard = self.lock.lock().await;
        let mut orders = self.load().await?.orders;
        orders.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(orders)
    }

    async fn get_order(&self, id: i64) -> StoreResult<Order> {
        let _guard = self.lock.lock().await;
        self.load()
            .await?
            .orders
            .into_iter()
            .find(|order| order.id == id)
            .ok_or_else(|| StoreError::NotFound("order".into()))
    }

    async fn create_order(&self, order: NewOrder) -> StoreResult<Order> {
        let _guard = self.lock.lock().await;
        let mut blob = self.load().await?;
        let order = order.into_order(next_id(&blob.orders)?);
        blob.orders.push(order.clone());
        let total = blob.orders.len();
        self.save(blob).await?;
        record_change("created", total);
        Ok(order)
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> StoreResult<Order> {
        let _guard = self.lock.lock().await;
        let mut blob = self.load().await?;
        let order = blob
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or_else(|| StoreError::NotFound("order".into()))?;
        order.status = status;
        let updated = order.clone();
        let total = blob.orders.len();
        self.save(blob).await?;
        record_change("updated", total);
        Ok(updated)
    }

    async fn delete_order(&self, id: i64) -> StoreResult<bool> {
        let _guard = self.lock.lock().await;
        let mut blob = self.load().await?;
        let before = blob.orders.len();
        blob.orders.retain(|order| order.id != id);
        let total = blob.orders.len();
        if total == before {
            return Ok(false);
        }
        self.save(blob).await?;
        record_change("deleted", total);
        Ok(true)
    }

    async fn health_check(&self) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        self.load().await.map(|_| ())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
