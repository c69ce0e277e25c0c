//! Runtime configuration types for evpipe.
//!
//! These are the resolved, immutable values each service is built from.
//! Reading the TOML file and applying CLI overrides is handled by the
//! binary crates; the result is passed explicitly to constructors.

mod config_store;
mod consumer;
mod propagator;

pub use config_store::ConfigStore;
pub use consumer::{ConsumerConfig, StorageBackend, StorageConfig};
pub use propagator::PropagatorConfig;

/// Default consumer port.
pub const DEFAULT_PORT: u16 = 8001;
/// Default SQLite file of the event store.
pub const DEFAULT_DATABASE_PATH: &str = "events.db";
/// Default propagator tick interval.
pub const DEFAULT_INTERVAL_SECONDS: u64 = 5;
/// Default ingestion endpoint the propagator sends to.
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8001/event";
/// Default catalog file.
pub const DEFAULT_EVENTS_FILE: &str = "events.json";
