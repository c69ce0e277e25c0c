//! evpipe propagator
//!
//! Periodically sends one event, picked at random from a catalog file, to
//! the consumer's ingestion endpoint.

mod config;
mod shutdown;

use clap::Parser;
use config::{ConfigLoader, Overrides};
use evpipe_core::catalog::Catalog;
use evpipe_core::config::ConfigStore;
use evpipe_core::processors::{EventSender, Propagator};
use evpipe_sdk::client::EventClient;
use shutdown::spawn_signal_handler;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// evpipe propagator - periodic random event emitter
#[derive(Parser, Debug)]
#[command(name = "evpipe-propagator")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Interval in seconds (overrides configuration)
    #[arg(short, long)]
    interval: Option<u64>,

    /// API endpoint (overrides configuration)
    #[arg(short, long)]
    endpoint: Option<Url>,

    /// Events file path (overrides configuration)
    #[arg(long)]
    events_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting evpipe-propagator v{}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration once; overrides win over file values
    let config_loader = ConfigLoader::new(
        &args.config,
        Overrides {
            interval_seconds: args.interval,
            api_endpoint: args.endpoint,
            events_file: args.events_file,
        },
    );
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    // A missing or broken catalog is not fatal; the loop just has nothing to send
    let catalog = ConfigStore::new(Catalog::load_or_empty(&config.events_file));

    tracing::info!(
        endpoint = %config.api_endpoint,
        interval_secs = config.interval.as_secs(),
        events_file = %config.events_file.display(),
        "Propagator configured"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal_handle = spawn_signal_handler(shutdown_tx, catalog.clone(), config.events_file);

    let sender = EventSender::new(EventClient::new(config.api_endpoint));
    let summary = Propagator::new(sender, catalog, config.interval)
        .run(shutdown_rx)
        .await;

    signal_handle.abort();
    tracing::info!(
        sends = summary.sends,
        delivered = summary.delivered,
        "Event propagator stopped"
    );

    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper_util=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
