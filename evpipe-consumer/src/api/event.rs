//! `POST /event` handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use evpipe_core::store::StorageError;
use evpipe_sdk::objects::{ErrorResponse, SubmitEventResponse};

use crate::api::extractors::EventBody;
use crate::state::AppState;

/// `POST /event` — persist one validated event.
///
/// Schema violations are rejected by the [`EventBody`] extractor before
/// this handler runs, so nothing is written for an invalid body.
pub async fn submit_event(
    State(state): State<AppState>,
    EventBody(event): EventBody,
) -> Result<impl IntoResponse, EventApiError> {
    let event_id = state
        .store
        .save(event.event_type.as_str(), event.event_payload.as_str())
        .await
        .map_err(EventApiError::Storage)?;

    tracing::info!(
        event_id,
        event_type = %event.event_type,
        event_payload = %event.event_payload,
        "Event saved"
    );

    Ok(Json(SubmitEventResponse::saved(event_id)))
}

/// Errors that can occur in the `POST /event` handler.
#[derive(Debug)]
pub enum EventApiError {
    /// The event store failed.
    Storage(StorageError),
}

impl IntoResponse for EventApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            EventApiError::Storage(e) => {
                tracing::error!(error = %e, "Failed to save event");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::server::build_router;
    use crate::state::AppState;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use evpipe_core::store::EventStore;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_app() -> (tempfile::TempDir, EventStore, Router) {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(dir.path().join("events.db")).await.unwrap();
        let router = build_router(AppState::new(store.clone()));
        (dir, store, router)
    }

    async fn post_event(router: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/event")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_valid_events_get_increasing_ids() {
        let (_dir, store, router) = test_app().await;

        let mut last_id = 0;
        for payload in ["user1", "user2", "user3"] {
            let body = json!({"event_type": "login", "event_payload": payload}).to_string();
            let (status, json) = post_event(&router, body).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["status"], "success");
            assert_eq!(json["message"], "Event saved successfully");
            let event_id = json["event_id"].as_i64().unwrap();
            assert!(event_id > last_id);
            last_id = event_id;
        }

        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_payload_is_rejected_without_insert() {
        let (_dir, store, router) = test_app().await;

        let (status, json) = post_event(&router, r#"{"event_type": "login"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["detail"].as_str().unwrap().contains("event_payload"));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_json_is_rejected_without_insert() {
        let (_dir, store, router) = test_app().await;

        let (status, json) = post_event(&router, "definitely not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"detail": "Invalid JSON format"}));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_strings_are_rejected() {
        let (_dir, store, router) = test_app().await;

        let (status, json) =
            post_event(&router, r#"{"event_type": "login", "event_payload": ""}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["detail"],
            "Invalid data format: event_payload must not be empty"
        );
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let (_dir, store, router) = test_app().await;
        store.close().await;

        let (status, json) = post_event(
            &router,
            r#"{"event_type": "login", "event_payload": "user123"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"detail": "Internal server error"}));
    }
}
