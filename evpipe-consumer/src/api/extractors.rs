//! Custom Axum extractor for strict event bodies.
//!
//! `EventBody` reads the raw request body and applies the
//! [`EventSubmission`] schema itself, so that malformed JSON and schema
//! violations produce the consumer's own `{"detail": ...}` errors instead of
//! axum's default `Json` rejections.

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evpipe_sdk::objects::{ErrorResponse, EventSubmission};

/// Upper bound on accepted request bodies.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A validated `POST /event` body.
pub struct EventBody(pub EventSubmission);

/// Errors that can occur while extracting an [`EventBody`].
#[derive(Debug, thiserror::Error)]
pub enum EventRejection {
    #[error("failed to read request body")]
    BodyReadError,
    #[error("Invalid JSON format")]
    MalformedJson,
    #[error("Invalid data format: {0}")]
    Validation(String),
}

/// Parse and validate a raw `POST /event` body.
///
/// Anything that is not JSON is malformed; JSON that is not an object of
/// exactly `{event_type, event_payload}` with non-empty strings fails
/// validation with a description of the first violation.
pub fn parse_submission(body: &[u8]) -> Result<EventSubmission, EventRejection> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| EventRejection::MalformedJson)?;

    if !value.is_object() {
        return Err(EventRejection::Validation(
            "expected a JSON object".to_string(),
        ));
    }

    let submission: EventSubmission =
        serde_json::from_value(value).map_err(|e| EventRejection::Validation(e.to_string()))?;
    submission
        .validate()
        .map_err(|e| EventRejection::Validation(e.to_string()))?;

    Ok(submission)
}

impl IntoResponse for EventRejection {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Rejected event submission");
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

impl<S: Send + Sync> FromRequest<S> for EventBody {
    type Rejection = EventRejection;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let body_bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|_| EventRejection::BodyReadError)?;

        parse_submission(&body_bytes).map(EventBody)
    }
}
