//! Drinks2U order API entry point.
//!
//! # Purpose
//! Wires configuration, the selected order store and the HTTP router, then
//! serves the API and the metrics listener until Ctrl+C.
//!
//! # Notes
//! `build_state` and `run_with_shutdown` are split out so startup can be
//! exercised from tests without signals.
use anyhow::Context;
use orders::app::{AppState, build_router};
use orders::config::{OrdersConfig, StorageBackend};
use orders::observability;
use orders::store::OrderStore;
use orders::store::local::LocalStorageStore;
use orders::store::memory::InMemoryStore;
use orders::store::sqlite::SqliteStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

const SERVICE_NAME: &str = "drinks2u-api";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = OrdersConfig::from_env_or_yaml().context("load drinks2u config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: OrdersConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability(SERVICE_NAME)?;
    let state = build_state(&config).await?;
    tracing::info!(
        backend = state.store.backend_name(),
        durable = state.store.is_durable(),
        beverages = state.menu.beverages().len(),
        "order store ready"
    );

    let (metrics_stop_tx, metrics_stop_rx) = oneshot::channel::<()>();
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
        async move {
            let _ = metrics_stop_rx.await;
        },
    ));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "drinks2u api listening");
    let served = axum::serve(listener, build_router(state).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await;
    tracing::info!("drinks2u api stopped");

    let _ = metrics_stop_tx.send(());
    match tokio::time::timeout(Duration::from_secs(5), metrics_task).await {
        Ok(Ok(Err(err))) => tracing::warn!(error = %err, "metrics listener failed"),
        Ok(Err(err)) => tracing::warn!(error = %err, "metrics task panicked"),
        Err(_) => tracing::warn!("metrics listener did not stop in time"),
        Ok(Ok(Ok(()))) => {}
    }
    served.context("serve drinks2u api")
}

async fn build_state(config: &OrdersConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn OrderStore + Send + Sync> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::Sqlite => Arc::new(
            SqliteStore::connect(&config.sqlite)
                .await
                .with_context(|| format!("open sqlite store {}", config.sqlite.path))?,
        ),
        StorageBackend::Local => {
            let store = LocalStorageStore::open(config.local_storage_path.clone());
            store
                .health_check()
                .await
                .with_context(|| format!("read local storage {}", store.path().display()))?;
            Arc::new(store)
        }
    };
    Ok(AppState {
        store,
        menu: config.menu.clone(),
    })
}
