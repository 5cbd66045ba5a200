// Command-line front-end for Drinks2U: staff place orders, admins list,
// mark ready and delete them, either through the HTTP API or directly
// against a local storage blob.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orders::client::OrdersClient;
use orders::config::OrdersConfig;
use orders::model::{Menu, Order, OrderRequest, OrderStatus};
use orders::store::local::LocalStorageStore;
use orders::store::{OrderStore, StoreError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "drinks2u-cli")]
#[command(about = "Place and manage Drinks2U beverage orders")]
struct Cli {
    /// Base URL of the Drinks2U API
    #[arg(
        long,
        env = "DRINKS2U_API_URL",
        default_value = "http://localhost:3001",
        conflicts_with = "local_storage"
    )]
    api_url: String,

    /// Work on a local storage file instead of the API
    #[arg(long, env = "DRINKS2U_LOCAL_STORAGE")]
    local_storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Place a new order
    Order {
        /// Staff badge number (up to 3 digits)
        #[arg(long)]
        registration: String,
        #[arg(long)]
        beverage: String,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// List all orders, newest first
    List,
    /// Mark an order as Ready
    Ready { id: i64 },
    /// Set an order's status (Pending or Ready)
    Status { id: i64, status: String },
    /// Delete an order
    Delete { id: i64 },
    /// Show the beverage menu
    Menu,
}

enum Backend {
    Http(OrdersClient),
    Local {
        store: LocalStorageStore,
        menu: Menu,
    },
}

impl Backend {
    async fn list(&self) -> Result<Vec<Order>> {
        match self {
            Backend::Http(client) => Ok(client.list_orders().await?),
            Backend::Local { store, .. } => Ok(store.list_orders().await?),
        }
    }

    async fn place(&self, request: OrderRequest) -> Result<Order> {
        match self {
            Backend::Http(client) => Ok(client.create_order(&request).await?),
            Backend::Local { store, menu } => {
                let new_order = menu.intake(&request)?;
                Ok(store.create_order(new_order).await?)
            }
        }
    }

    async fn set_status(&self, id: i64, status: &str) -> Result<Order> {
        match self {
            Backend::Http(client) => Ok(client.update_status(id, status).await?),
            Backend::Local { store, .. } => {
                let status: OrderStatus = status.parse()?;
                match store.update_status(id, status).await {
                    Ok(order) => Ok(order),
                    Err(StoreError::NotFound(_)) => anyhow::bail!("Order not found"),
                    Err(err) => Err(err.into()),
                }
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<String> {
        match self {
            Backend::Http(client) => Ok(client.delete_order(id).await?),
            Backend::Local { store, .. } => {
                store.delete_order(id).await?;
                Ok("Order deleted successfully".to_string())
            }
        }
    }

    async fn menu(&self) -> Result<Vec<String>> {
        match self {
            Backend::Http(client) => Ok(client.beverages().await?),
            Backend::Local { menu, .. } => Ok(menu.beverages().to_vec()),
        }
    }
}

fn format_order(order: &Order) -> String {
    format!(
        "#{:<14} reg {:>3}  {:>3} x {:<16} {:<8} {}",
        order.id,
        order.registration,
        order.quantity,
        order.beverage,
        order.status.as_str(),
        order.timestamp
    )
}

async fn execute(backend: &Backend, command: Command) -> Result<String> {
    match command {
        Command::Order {
            registration,
            beverage,
            quantity,
        } => {
            let order = backend
                .place(OrderRequest {
                    registration: Some(registration),
                    beverage: Some(beverage),
                    quantity: Some(quantity),
                })
                .await?;
            Ok(format!("Order placed\n{}", format_order(&order)))
        }
        Command::List => {
            let orders = backend.list().await?;
            if orders.is_empty() {
                return Ok("No orders yet".to_string());
            }
            Ok(orders
                .iter()
                .map(format_order)
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Ready { id } => {
            let order = backend.set_status(id, OrderStatus::Ready.as_str()).await?;
            Ok(format_order(&order))
        }
        Command::Status { id, status } => {
            let order = backend.set_status(id, &status).await?;
            Ok(format_order(&order))
        }
        Command::Delete { id } => backend.delete(id).await,
        Command::Menu => Ok(backend.menu().await?.join("\n")),
    }
}

fn connect(cli: &Cli) -> Result<Backend> {
    match &cli.local_storage {
        Some(path) => {
            let config = OrdersConfig::from_env_or_yaml().context("load drinks2u config")?;
            tracing::debug!(path = %path.display(), "using local storage");
            Ok(Backend::Local {
                store: LocalStorageStore::open(path.clone()),
                menu: config.menu,
            })
        }
        None => {
            tracing::debug!(api_url = %cli.api_url, "using drinks2u api");
            Ok(Backend::Http(OrdersClient::new(&cli.api_url)?))
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match connect(&cli) {
        Ok(backend) => execute(&backend, cli.command).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}
