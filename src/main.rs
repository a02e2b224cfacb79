//! Backend API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────┐
//!                      │                    GATEWAY                     │
//!     Browser Request  │  ┌────────┐    ┌──────────────┐    ┌────────┐  │
//!     ─────────────────┼─▶│  http  │───▶│ path proxy / │───▶│backend │──┼──▶ Backend API
//!                      │  │ server │    │  collection  │    │ client │  │
//!                      │  └────────┘    └──────┬───────┘    └────────┘  │
//!                      │                       │                        │
//!                      │                ┌──────▼───────┐                │
//!                      │                │   resolver   │                │
//!                      │                │ base + /api  │                │
//!                      │                └──────────────┘                │
//!                      │  ┌──────────────────────────────────────────┐  │
//!                      │  │ config (+ hot reload) │ observability     │  │
//!                      │  │ lifecycle             │ failure sink      │  │
//!                      │  └──────────────────────────────────────────┘  │
//!                      └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use backend_gateway::config::loader::{config_from_env, load_config, BACKEND_URL_ENV};
use backend_gateway::config::watcher::ConfigWatcher;
use backend_gateway::lifecycle::signals::shutdown_on_signal;
use backend_gateway::observability::{init_logging, metrics, LogFormat};
use backend_gateway::{GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "backend-gateway")]
#[command(about = "Forwards browser API calls to the backend API", long_about = None)]
struct Cli {
    /// TOML configuration file; watched for backend changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener address, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,

    /// Backend base URL, overriding the config file and the environment.
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => config_from_env()?,
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
    }

    let format: LogFormat = config.observability.log_format.parse()?;
    init_logging(&config.observability.log_level, format)?;

    tracing::info!("backend-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.backend.base_url,
        env_var = BACKEND_URL_ENV,
        routes = config.routes.len(),
        backend_timeout_secs = config.backend.timeout_secs,
        "Configuration loaded"
    );

    let server = GatewayServer::new(config.clone())?;

    if config.observability.metrics_enabled {
        // Validation has already checked the address.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let _watcher = match &cli.config {
        Some(path) => Some(ConfigWatcher::new(path, config, server.backend()).run()?),
        None => None,
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
