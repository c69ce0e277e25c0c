//! TOML file configuration structures.
//!
//! These structs directly map to the `[event_consumer]` table of the shared
//! `config.toml`. Other tables in the file are ignored.

use evpipe_core::config::{DEFAULT_DATABASE_PATH, DEFAULT_PORT, StorageBackend};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub event_consumer: ConsumerSection,
}

/// Consumer section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerSection {
    /// Port to listen on (all interfaces).
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: DatabaseSection,
}

impl Default for ConsumerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            database: DatabaseSection::default(),
        }
    }
}

/// Storage backend and location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    #[serde(default, rename = "type")]
    pub backend: StorageBackend,
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_database_path(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}
