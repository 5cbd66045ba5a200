//! SQLite-backed implementation of the order store.
//!
//! # What this module is
//! The durable backend for the server deployment: a single `orders` table
//! accessed through a `sqlx` connection pool.
//!
//! # Key invariants
//! - `id` is an `AUTOINCREMENT` primary key, so ids are never reused even
//!   after the newest row is deleted.
//! - `status` defaults to `Pending` in the schema; inserts rely on that default.
//! - Each mutation runs in one transaction together with the re-read of the
//!   affected row and the row count reported to metrics; nothing fallible
//!   happens after commit.
//!
//! # Operational notes
//! - Migrations run at startup via `sqlx::migrate!("./migrations")` so
//!   handlers can assume the schema exists.
//! - The database file is created if missing.
//! - `acquire_timeout` bounds how long a request waits for a pooled
//!   connection; a locked or unreachable file fails fast instead of hanging.
use super::{OrderStore, StoreError, StoreResult, record_change};
use crate::config::SqliteConfig;
use crate::model::{NewOrder, Order, OrderStatus};
use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use std::time::Duration;

/// Durable order store backed by SQLite.
///
/// # Example
/// ```rust,no_run
/// use orders::config::SqliteConfig;
/// use orders::store::sqlite::SqliteStore;
///
/// async fn open(cfg: SqliteConfig) {
///     let _ = SqliteStore::connect(&cfg).await;
/// }
/// ```
pub struct SqliteStore {
    pool: SqlitePool,
}

/// Row shape for the `orders` table.
///
/// Kept apart from [`Order`] so the string-encoded status is parsed in one
/// place.
#[derive(Debug, Clone, FromRow)]
struct DbOrder {
    id: i64,
    registration: String,
    beverage: String,
    quantity: i64,
    status: String,
    timestamp: String,
}

const SELECT_ORDER: &str =
    "SELECT id, registration, beverage, quantity, status, timestamp FROM orders";

impl SqliteStore {
    /// Open (creating if needed) the database file and apply migrations.
    ///
    /// # Errors
    /// - Pool setup or connection failures.
    /// - Migration failures; startup should abort rather than serve a
    ///   partially initialized schema.
    pub async fn connect(cfg: &SqliteConfig) -> StoreResult<Self> {
        let connect_options = SqliteConnectOptions::new()
            .filename(&cfg.path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms))
            .connect_with(connect_options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let store = Self { pool };
        store.refresh_count().await?;
        tracing::info!(path = %cfg.path, "sqlite order store ready");
        Ok(store)
    }

    async fn refresh_count(&self) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        let total = count_orders(&mut conn).await?;
        metrics::gauge!("drinks2u_orders_total").set(total as f64);
        Ok(())
    }

    async fn fetch_order(&self, id: i64) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, DbOrder>(&format!("{SELECT_ORDER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(order_from_db).transpose()
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, DbOrder>(&format!("{SELECT_ORDER} ORDER BY id DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(order_from_db).collect()
    }

    async fn get_order(&self, id: i64) -> StoreResult<Order> {
        self.fetch_order(id)
            .await?
            .ok_or_else(|| StoreError::NotFound("order".into()))
    }

    async fn create_order(&self, order: NewOrder) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query(
            r#"INSERT INTO orders (registration, beverage, quantity, timestamp) VALUES (?, ?, ?, ?)"#,
        )
        .bind(&order.registration)
        .bind(&order.beverage)
        .bind(order.quantity)
        .bind(&order.timestamp)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, DbOrder>(&format!("{SELECT_ORDER} WHERE id = ?"))
            .bind(inserted.last_insert_rowid())
            .fetch_one(&mut *tx)
            .await?;
        let total = count_orders(&mut tx).await?;
        tx.commit().await?;

        record_change("created", total);
        order_from_db(row)
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status_to_str(status))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound("order".into()));
        }
        let row = sqlx::query_as::<_, DbOrder>(&format!("{SELECT_ORDER} WHERE id = ?"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let total = count_orders(&mut tx).await?;
        tx.commit().await?;

        record_change("updated", total);
        order_from_db(row)
    }

    async fn delete_order(&self, id: i64) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if removed.rows_affected() == 0 {
            return Ok(false);
        }
        let total = count_orders(&mut tx).await?;
        tx.commit().await?;

        record_change("deleted", total);
        Ok(true)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

// Read inside the mutating transaction so the gauge never forces a 500 after
// the write has committed.
async fn count_orders(conn: &mut SqliteConnection) -> StoreResult<usize> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&mut *conn)
        .await?;
    Ok(usize::try_from(total).unwrap_or_default())
}

fn order_from_db(row: DbOrder) -> StoreResult<Order> {
    Ok(Order {
        id: row.id,
        registration: row.registration,
        beverage: row.beverage,
        quantity: row.quantity,
        status: parse_status(&row.status)?,
        timestamp: row.timestamp,
    })
}

fn parse_status(value: &str) -> StoreResult<OrderStatus> {
    value
        .parse()
        .map_err(|_| StoreError::Unexpected(anyhow!("invalid order status {value}")))
}

fn status_to_str(status: OrderStatus) -> &'static str {
    status.as_str()
}
