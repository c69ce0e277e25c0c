//! Configuration module for evpipe-consumer.
//!
//! Resolves the consumer configuration once at startup from the TOML file
//! and CLI overrides. The result is immutable for the process lifetime.

pub mod file;

use crate::config::file::FileConfig;
use evpipe_core::config::{ConsumerConfig, StorageConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

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
    pub port: Option<u16>,
    pub db_path: Option<PathBuf>,
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
    pub fn load(&self) -> Result<ConsumerConfig, ConfigError> {
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
        if let Some(port) = self.overrides.port {
            file_config.event_consumer.port = port;
        }
        if let Some(db_path) = &self.overrides.db_path {
            file_config.event_consumer.database.path = db_path.clone();
        }

        self.validate(&file_config)?;

        let section = file_config.event_consumer;
        Ok(ConsumerConfig {
            port: section.port,
            storage: StorageConfig {
                backend: section.database.backend,
                path: section.database.path,
            },
        })
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.event_consumer.database.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "database path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evpipe_core::config::StorageBackend;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new(dir.path().join("config.toml"), Overrides::default())
            .load()
            .unwrap();

        assert_eq!(config.port, 8001);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.path, PathBuf::from("events.db"));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[event_consumer]\nport = 9000\n\n[event_consumer.database]\npath = \"file.db\"\n",
        )
        .unwrap();

        let from_file = ConfigLoader::new(&path, Overrides::default()).load().unwrap();
        assert_eq!(from_file.port, 9000);
        assert_eq!(from_file.storage.path, PathBuf::from("file.db"));

        let overridden = ConfigLoader::new(
            &path,
            Overrides {
                port: Some(9100),
                db_path: Some(PathBuf::from("override.db")),
            },
        )
        .load()
        .unwrap();
        assert_eq!(overridden.port, 9100);
        assert_eq!(overridden.storage.path, PathBuf::from("override.db"));
        assert_eq!(overridden.listen_addr().port(), 9100);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[event_consumer\nport = ").unwrap();

        assert!(matches!(
            ConfigLoader::new(&path, Overrides::default()).load(),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_database_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new(
            dir.path().join("config.toml"),
            Overrides {
                port: None,
                db_path: Some(PathBuf::new()),
            },
        )
        .load();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
