//! Durable, append-only event store.
//!
//! Thin facade over the [`stored_event`](crate::entities::stored_event)
//! processors that owns the SQLite pool and the storage location.

use crate::entities::stored_event::{
    CountStoredEvents, GetStoredEventById, InitEventSchema, ListStoredEvents, SaveEvent,
    StoredEvent,
};
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised by the event store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open event store at {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct EventStore {
    db: DatabaseProcessor,
    location: PathBuf,
}

impl EventStore {
    /// Open (creating if needed) the SQLite database at `location` and
    /// make sure the schema exists.
    pub async fn open(location: impl AsRef<Path>) -> Result<Self, StorageError> {
        let location = location.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&location)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|source| StorageError::Connect {
                path: location.display().to_string(),
                source,
            })?;

        let store = Self {
            db: DatabaseProcessor { pool },
            location,
        };
        store.init().await?;
        Ok(store)
    }

    /// Ensure the durable schema exists. Safe to call repeatedly.
    pub async fn init(&self) -> Result<(), StorageError> {
        self.db.process(InitEventSchema).await?;
        info!(location = %self.location.display(), "Event store initialized");
        Ok(())
    }

    /// Persist one event and return its assigned id.
    pub async fn save(
        &self,
        event_type: impl Into<String>,
        event_payload: impl Into<String>,
    ) -> Result<i64, StorageError> {
        let id = self
            .db
            .process(SaveEvent {
                event_type: event_type.into(),
                event_payload: event_payload.into(),
            })
            .await?;
        Ok(id)
    }

    pub async fn get(&self, id: i64) -> Result<Option<StoredEvent>, StorageError> {
        Ok(self.db.process(GetStoredEventById { id }).await?)
    }

    /// Events with an id greater than `after_id`, oldest first.
    pub async fn list(&self, after_id: i64, limit: i64) -> Result<Vec<StoredEvent>, StorageError> {
        Ok(self
            .db
            .process(ListStoredEvents { after_id, limit })
            .await?)
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        Ok(self.db.process(CountStoredEvents).await?)
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.db.pool.close().await;
    }
}
