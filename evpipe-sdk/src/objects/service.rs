//! Health/info response of the consumer service.

use serde::{Deserialize, Serialize};

/// Body of `GET /` on the consumer.
///
/// Used for liveness checks only; it never exposes stored data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    /// Location of the active event store.
    pub database: String,
}

impl ServiceInfo {
    pub const SERVICE_NAME: &'static str = "Event Consumer";

    pub fn running(database: impl Into<String>) -> Self {
        Self {
            service: Self::SERVICE_NAME.to_string(),
            status: "running".to_string(),
            database: database.into(),
        }
    }
}
