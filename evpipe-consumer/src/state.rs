//! Application state shared across all request handlers.

use evpipe_core::store::EventStore;

/// Application state that is shared across all request handlers.
///
/// Cheap to clone: the store only holds a pooled handle.
#[derive(Clone)]
pub struct AppState {
    /// Append-only event store.
    pub store: EventStore,
}

impl AppState {
    /// Create a new AppState around an opened event store.
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }
}
