//! Pulse - Server reachability checker with a cache-aside service layer

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LoggingConfig};
use pulse_api::{AppState, create_router};
use pulse_core::{CacheExecutor, ServerService, StatusConfig, StatusService};
use pulse_db::Database;
use pulse_probe::{HttpProber, ProbeConfig};

/// Pulse - Server reachability checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "PULSE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "PULSE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    init_logging(&config.logging);

    info!("Starting Pulse v{}", env!("CARGO_PKG_VERSION"));

    let metrics_handle = init_metrics();

    // Initialize database
    if let Some(parent) = Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Arc::new(Database::new(&db_url).await?);

    // Initialize probe client
    let prober = Arc::new(HttpProber::new(ProbeConfig {
        connect_timeout: config.probe.connect_timeout(),
        read_timeout: config.probe.read_timeout(),
        use_system_proxy: config.probe.use_system_proxy,
    })?);

    // Initialize services sharing one cache
    let cache = CacheExecutor::default();
    let servers = Arc::new(ServerService::new(db.clone(), db.clone(), cache.clone()));
    let statuses = Arc::new(StatusService::new(
        db.clone(),
        db,
        prober,
        cache.clone(),
        StatusConfig {
            max_concurrency: config.probe.max_concurrency,
            default_server_name: config.probe.default_server_name.clone(),
        },
    ));

    let state = AppState::new(servers, statuses, cache);

    let app = create_router(state, metrics_handle).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Install the Prometheus recorder; metrics stay disabled if that fails
fn init_metrics() -> Option<Arc<PrometheusHandle>> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics initialized");
            Some(Arc::new(handle))
        }
        Err(e) => {
            error!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
