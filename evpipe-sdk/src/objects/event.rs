//! Event submission types for the ingestion endpoint.

use serde::{Deserialize, Serialize};

/// An untyped event template as read from the propagator's catalog.
///
/// The propagator forwards these verbatim; only the consumer applies the
/// [`EventSubmission`] schema.
pub type RawEvent = serde_json::Value;

/// Request body for `POST /event`.
///
/// Unknown fields are rejected so that the accepted shape is exactly
/// `{event_type, event_payload}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventSubmission {
    pub event_type: String,
    pub event_payload: String,
}

/// A field of [`EventSubmission`] that failed the non-empty check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EventFieldError {
    #[error("event_type must not be empty")]
    EmptyEventType,
    #[error("event_payload must not be empty")]
    EmptyEventPayload,
}

impl EventSubmission {
    pub fn new(event_type: impl Into<String>, event_payload: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            event_payload: event_payload.into(),
        }
    }

    /// Check the constraints serde cannot express.
    ///
    /// Fields are checked in declaration order and the first violation is
    /// returned.
    pub fn validate(&self) -> Result<(), EventFieldError> {
        if self.event_type.is_empty() {
            return Err(EventFieldError::EmptyEventType);
        }
        if self.event_payload.is_empty() {
            return Err(EventFieldError::EmptyEventPayload);
        }
        Ok(())
    }
}

/// Response returned by `POST /event` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitEventResponse {
    /// Always `"success"`.
    pub status: String,
    pub message: String,
    /// Identifier assigned by the event store.
    pub event_id: i64,
}

impl SubmitEventResponse {
    pub fn saved(event_id: i64) -> Self {
        Self {
            status: "success".to_string(),
            message: "Event saved successfully".to_string(),
            event_id,
        }
    }
}

/// Error body returned by the consumer for any non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
