//! Signal handling for graceful shutdown and catalog reload.

use evpipe_core::catalog::Catalog;
use evpipe_core::config::ConfigStore;
use std::path::{Path, PathBuf};
use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spawns a task that turns process signals into loop control.
///
/// - SIGTERM / SIGINT set the shutdown flag once and end the task.
/// - SIGHUP reloads the catalog from `events_file` and swaps it in
///   wholesale. A reload that fails keeps the current catalog.
pub fn spawn_signal_handler(
    shutdown_tx: watch::Sender<bool>,
    catalog: ConfigStore<Catalog>,
    events_file: PathBuf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut sigterm = install(SignalKind::terminate(), "SIGTERM");
        let mut sighup = install(SignalKind::hangup(), "SIGHUP");

        loop {
            tokio::select! {
                _ = recv(&mut sigterm) => {
                    tracing::info!("Received SIGTERM, stopping after the current tick");
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT, stopping after the current tick");
                    break;
                }
                _ = recv(&mut sighup) => {
                    tracing::info!(path = %events_file.display(), "Received SIGHUP, reloading events catalog");
                    reload_catalog(&catalog, &events_file).await;
                }
            }
        }

        let _ = shutdown_tx.send(true);
    })
}

/// Replace the catalog with the current content of `events_file`.
pub async fn reload_catalog(catalog: &ConfigStore<Catalog>, events_file: &Path) {
    match Catalog::load(events_file) {
        Ok(new_catalog) => {
            let count = new_catalog.len();
            let version = catalog.update(new_catalog).await;
            tracing::info!(count, version, "Events catalog reloaded");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload events catalog, keeping the current one");
        }
    }
}

fn install(kind: SignalKind, name: &str) -> Option<Signal> {
    signal(kind)
        .map_err(|e| tracing::error!(error = %e, "Failed to install {name} handler"))
        .ok()
}

/// Wait for the next delivery of `signal`, or forever if it is not installed.
async fn recv(signal: &mut Option<Signal>) {
    match signal {
        Some(signal) => {
            signal.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}
