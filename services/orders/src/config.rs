use crate::model::{DEFAULT_BEVERAGES, DEFAULT_MAX_QUANTITY, Menu};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BIND: &str = "0.0.0.0:3001";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9091";
pub const DEFAULT_SQLITE_PATH: &str = "drinks2u.db";
pub const DEFAULT_SQLITE_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SQLITE_ACQUIRE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LOCAL_STORAGE_PATH: &str = "drinks2u-local.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            "local" => Ok(StorageBackend::Local),
            other => bail!("unknown storage backend {other:?} (expected memory, sqlite or local)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub path: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

// Order service configuration sourced from environment variables, optionally
// overridden by a YAML file.
#[derive(Debug, Clone)]
pub struct OrdersConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub sqlite: SqliteConfig,
    pub local_storage_path: PathBuf,
    pub menu: Menu,
}

#[derive(Debug, Default, Deserialize)]
struct OrdersConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<StorageBackend>,
    sqlite_path: Option<String>,
    sqlite_max_connections: Option<u32>,
    sqlite_acquire_timeout_ms: Option<u64>,
    local_storage_path: Option<PathBuf>,
    max_quantity: Option<i64>,
    beverages: Option<Vec<String>>,
}

impl OrdersConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("DRINKS2U_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read DRINKS2U_CONFIG: {path}"))?;
            let override_cfg: OrdersConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse orders config yaml")?;
            config.apply(override_cfg)?;
        }
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr: SocketAddr = get("DRINKS2U_BIND", DEFAULT_BIND)
            .parse()
            .with_context(|| "parse DRINKS2U_BIND")?;
        let metrics_bind: SocketAddr = get("DRINKS2U_METRICS_BIND", DEFAULT_METRICS_BIND)
            .parse()
            .with_context(|| "parse DRINKS2U_METRICS_BIND")?;
        let storage: StorageBackend = get("DRINKS2U_STORAGE_BACKEND", "sqlite")
            .parse()
            .with_context(|| "parse DRINKS2U_STORAGE_BACKEND")?;
        let max_connections: u32 = get(
            "DRINKS2U_SQLITE_MAX_CONNECTIONS",
            &DEFAULT_SQLITE_MAX_CONNECTIONS.to_string(),
        )
        .parse()
        .with_context(|| "parse DRINKS2U_SQLITE_MAX_CONNECTIONS")?;
        let acquire_timeout_ms: u64 = get(
            "DRINKS2U_SQLITE_ACQUIRE_TIMEOUT_MS",
            &DEFAULT_SQLITE_ACQUIRE_TIMEOUT_MS.to_string(),
        )
        .parse()
        .with_context(|| "parse DRINKS2U_SQLITE_ACQUIRE_TIMEOUT_MS")?;
        let max_quantity: i64 = get("DRINKS2U_MAX_QUANTITY", &DEFAULT_MAX_QUANTITY.to_string())
            .parse()
            .with_context(|| "parse DRINKS2U_MAX_QUANTITY")?;
        let beverages = match lookup("DRINKS2U_BEVERAGES") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_BEVERAGES.iter().map(|b| b.to_string()).collect(),
        };

        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            sqlite: SqliteConfig {
                path: get("DRINKS2U_SQLITE_PATH", DEFAULT_SQLITE_PATH),
                max_connections,
                acquire_timeout_ms,
            },
            local_storage_path: PathBuf::from(get(
                "DRINKS2U_LOCAL_STORAGE_PATH",
                DEFAULT_LOCAL_STORAGE_PATH,
            )),
            menu: build_menu(beverages, max_quantity)?,
        })
    }

    fn apply(&mut self, override_cfg: OrdersConfigOverride) -> Result<()> {
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value;
        }
        if let Some(value) = override_cfg.sqlite_path {
            self.sqlite.path = value;
        }
        if let Some(value) = override_cfg.sqlite_max_connections {
            self.sqlite.max_connections = value;
        }
        if let Some(value) = override_cfg.sqlite_acquire_timeout_ms {
            self.sqlite.acquire_timeout_ms = value;
        }
        if let Some(value) = override_cfg.local_storage_path {
            self.local_storage_path = value;
        }
        if override_cfg.max_quantity.is_some() || override_cfg.beverages.is_some() {
            let beverages = override_cfg
                .beverages
                .unwrap_or_else(|| self.menu.beverages().to_vec());
            let max_quantity = override_cfg
                .max_quantity
                .unwrap_or(self.menu.max_quantity());
            self.menu = build_menu(beverages, max_quantity)?;
        }
        Ok(())
    }
}

fn build_menu(beverages: Vec<String>, max_quantity: i64) -> Result<Menu> {
    if beverages.is_empty() {
        bail!("beverage menu must not be empty");
    }
    if max_quantity <= 0 {
        bail!("max quantity must be positive, got {max_quantity}");
    }
    Ok(Menu::new(beverages, max_quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = OrdersConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config.bind_addr, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.metrics_bind, DEFAULT_METRICS_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.sqlite.path, DEFAULT_SQLITE_PATH);
        assert_eq!(config.sqlite.max_connections, DEFAULT_SQLITE_MAX_CONNECTIONS);
        assert_eq!(config.local_storage_path, PathBuf::from(DEFAULT_LOCAL_STORAGE_PATH));
        assert_eq!(config.menu, Menu::default());
    }

    #[test]
    fn env_values_override_defaults() {
        let config = OrdersConfig::from_lookup(lookup(&[
            ("DRINKS2U_BIND", "127.0.0.1:4000"),
            ("DRINKS2U_STORAGE_BACKEND", "Memory"),
            ("DRINKS2U_MAX_QUANTITY", "10"),
            ("DRINKS2U_BEVERAGES", "Agua, Cerveja ,,"),
        ]))
        .expect("config");
        assert_eq!(config.bind_addr, "127.0.0.1:4000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.menu.max_quantity(), 10);
        assert_eq!(config.menu.beverages(), ["Agua", "Cerveja"]);
    }

    #[test]
    fn invalid_values_are_rejected_with_context() {
        let err = OrdersConfig::from_lookup(lookup(&[("DRINKS2U_BIND", "nope")])).unwrap_err();
        assert!(err.to_string().contains("DRINKS2U_BIND"));

        let err = OrdersConfig::from_lookup(lookup(&[("DRINKS2U_STORAGE_BACKEND", "postgres")]))
            .unwrap_err();
        assert!(err.to_string().contains("DRINKS2U_STORAGE_BACKEND"));

        let err =
            OrdersConfig::from_lookup(lookup(&[("DRINKS2U_MAX_QUANTITY", "0")])).unwrap_err();
        assert!(err.to_string().contains("max quantity"));

        let err = OrdersConfig::from_lookup(lookup(&[("DRINKS2U_BEVERAGES", " , ")])).unwrap_err();
        assert!(err.to_string().contains("menu"));
    }

    #[test]
    fn yaml_override_replaces_selected_fields() {
        let mut config = OrdersConfig::from_lookup(lookup(&[])).expect("config");
        let override_cfg: OrdersConfigOverride = serde_yaml::from_str(
            "bind_addr: 127.0.0.1:5000\nstorage: local\nlocal_storage_path: /tmp/orders.json\nmax_quantity: 10\n",
        )
        .expect("yaml");
        config.apply(override_cfg).expect("apply");
        assert_eq!(config.bind_addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.storage, StorageBackend::Local);
        assert_eq!(config.local_storage_path, PathBuf::from("/tmp/orders.json"));
        assert_eq!(config.menu.max_quantity(), 10);
        assert_eq!(config.menu.beverages().len(), DEFAULT_BEVERAGES.len());
    }

    #[test]
    #[serial]
    fn from_env_or_yaml_reads_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("orders.yaml");
        fs::write(&path, "storage: memory\nbeverages: [Water]\n").expect("write yaml");
        let prev = std::env::var("DRINKS2U_CONFIG").ok();
        unsafe {
            std::env::set_var("DRINKS2U_CONFIG", &path);
        }
        let result = OrdersConfig::from_env_or_yaml();
        unsafe {
            match prev {
                Some(value) => std::env::set_var("DRINKS2U_CONFIG", value),
                None => std::env::remove_var("DRINKS2U_CONFIG"),
            }
        }
        let config = result.expect("config");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.menu.beverages(), ["Water"]);
    }
}
