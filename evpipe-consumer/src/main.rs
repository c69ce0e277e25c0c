//! evpipe consumer
//!
//! Accepts events over HTTP, validates them and persists them to the
//! append-only event store.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, Overrides};
use evpipe_core::store::EventStore;
use server::{build_router, run_server};
use state::AppState;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

/// evpipe consumer - event ingestion service
#[derive(Parser, Debug)]
#[command(name = "evpipe-consumer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Server port (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Database file path (overrides configuration)
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting evpipe-consumer v{}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration once; overrides win over file values
    let config_loader = ConfigLoader::new(
        &args.config,
        Overrides {
            port: args.port,
            db_path: args.db_path,
        },
    );
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    // Open the event store; failing here aborts before any traffic is accepted
    tracing::info!(
        backend = %config.storage.backend,
        path = %config.storage.path.display(),
        "Opening event store..."
    );
    let store = EventStore::open(&config.storage.path).await.map_err(|e| {
        tracing::error!("Failed to initialize event store: {}", e);
        e
    })?;

    let state = AppState::new(store.clone());
    let router = build_router(state);

    // Run the server
    let listen_addr = config.listen_addr();
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Close database connections gracefully
    tracing::info!("Closing database connections...");
    store.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
