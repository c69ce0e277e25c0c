//! Event catalog.
//!
//! The catalog is the fixed list of event templates the propagator picks
//! from. It is read from a JSON array file at startup and only replaced
//! wholesale on an explicit reload.

use evpipe_sdk::objects::RawEvent;
use rand::seq::IndexedRandom;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that can occur while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The set of candidate events eligible for random selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    events: Vec<RawEvent>,
}

impl Catalog {
    pub fn from_events(events: Vec<RawEvent>) -> Self {
        Self { events }
    }

    /// Load the catalog from a JSON array file.
    ///
    /// A missing file is not an error: it yields an empty catalog so the
    /// propagator can start degraded. Unreadable or malformed files are
    /// reported as [`CatalogError`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Events file not found, catalog is empty");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CatalogError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let events: Vec<RawEvent> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Malformed {
                path: path.display().to_string(),
                source,
            })?;

        info!(count = events.len(), path = %path.display(), "Loaded events catalog");
        Ok(Self { events })
    }

    /// Load the catalog, falling back to an empty one on any error.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            error!(error = %e, "Failed to load events catalog, continuing with no events");
            Self::default()
        })
    }

    /// Pick one event uniformly at random.
    ///
    /// Every call is independent; the same event may be returned twice in a
    /// row. Returns `None` for an empty catalog.
    pub fn pick_random(&self) -> Option<&RawEvent> {
        self.events.choose(&mut rand::rng())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[RawEvent] {
        &self.events
    }
}
