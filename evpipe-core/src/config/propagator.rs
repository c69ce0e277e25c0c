//! Propagator configuration.

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Resolved configuration of the propagator service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagatorConfig {
    /// Pause between the end of one send and the next tick.
    pub interval: Duration,
    /// Full URL of the consumer's ingestion endpoint.
    pub api_endpoint: Url,
    /// JSON file holding the event catalog.
    pub events_file: PathBuf,
}
