//! TOML file configuration structures.
//!
//! These structs directly map to the `[event_propagator]` table of the
//! shared `config.toml`. Other tables in the file are ignored.

use evpipe_core::config::{DEFAULT_API_ENDPOINT, DEFAULT_EVENTS_FILE, DEFAULT_INTERVAL_SECONDS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub event_propagator: PropagatorSection,
}

/// Propagator section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagatorSection {
    /// Seconds to wait between the end of one send and the next tick.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    /// Full URL of the consumer's ingestion endpoint.
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: Url,
    /// JSON array file with the event catalog.
    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,
}

impl Default for PropagatorSection {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            api_endpoint: default_api_endpoint(),
            events_file: default_events_file(),
        }
    }
}

fn default_interval_seconds() -> u64 {
    DEFAULT_INTERVAL_SECONDS
}

fn default_api_endpoint() -> Url {
    Url::parse(DEFAULT_API_ENDPOINT).expect("valid default endpoint")
}

fn default_events_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[event_consumer]
port = 8001

[event_propagator]
interval_seconds = 2
api_endpoint = "http://consumer.internal:9000/event"
events_file = "/etc/evpipe/events.json"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let section = config.event_propagator;
        assert_eq!(section.interval_seconds, 2);
        assert_eq!(section.api_endpoint.host_str(), Some("consumer.internal"));
        assert_eq!(section.events_file, PathBuf::from("/etc/evpipe/events.json"));
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: FileConfig = toml::from_str("[event_propagator]\ninterval_seconds = 9\n").unwrap();
        let section = config.event_propagator;
        assert_eq!(section.interval_seconds, 9);
        assert_eq!(section.api_endpoint.as_str(), "http://localhost:8001/event");
        assert_eq!(section.events_file, PathBuf::from("events.json"));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let toml_str = "[event_propagator]\napi_endpoint = \"not a url\"\n";
        assert!(toml::from_str::<FileConfig>(toml_str).is_err());
    }
}
