//! Ingestion API.
//!
//! # Endpoints
//!
//! - `POST /event` – validate and persist one event

pub mod event;
pub mod extractors;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Build the ingestion API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/event", post(event::submit_event))
}
