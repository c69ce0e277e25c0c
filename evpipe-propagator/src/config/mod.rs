//! Configuration module for evpipe-propagator.
//!
//! Resolves the propagator configuration once at startup from the TOML
//! file and CLI overrides.

pub mod file;

use crate::config::file::FileConfig;
use evpipe_core::config::PropagatorConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub interval_seconds: Option<u64>,
    pub api_endpoint: Option<Url>,
    pub events_file: Option<PathBuf>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load and resolve the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, or fall back to defaults if it does not exist
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    pub fn load(&self) -> Result<PropagatorConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str::<FileConfig>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    "Configuration file not found, using default values"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        // Apply CLI overrides
        let section = &mut file_config.event_propagator;
        if let Some(interval_seconds) = self.overrides.interval_seconds {
            section.interval_seconds = interval_seconds;
        }
        if let Some(api_endpoint) = &self.overrides.api_endpoint {
            section.api_endpoint = api_endpoint.clone();
        }
        if let Some(events_file) = &self.overrides.events_file {
            section.events_file = events_file.clone();
        }

        self.validate(&file_config)?;

        let section = file_config.event_propagator;
        Ok(PropagatorConfig {
            interval: Duration::from_secs(section.interval_seconds),
            api_endpoint: section.api_endpoint,
            events_file: section.events_file,
        })
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let section = &config.event_propagator;
        if section.interval_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "interval_seconds must be at least 1".to_string(),
            ));
        }
        if !matches!(section.api_endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "api_endpoint must be an http(s) URL, got {}",
                section.api_endpoint
            )));
        }
        Ok(())
    }
}
