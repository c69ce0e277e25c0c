//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use evpipe_sdk::objects::ServiceInfo;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health/info endpoint
        .route("/", get(service_info))
        .merge(api::router())
        // Add state to all routes
        .with_state(state)
}

/// Liveness check reporting the active storage location.
async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(ServiceInfo::running(
        state.store.location().display().to_string(),
    ))
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("API endpoint: http://localhost:{}/event", addr.port());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
