//! EventSender processor.
//!
//! The EventSender is responsible for:
//! - Receiving one `RawEvent` per tick from the propagator loop
//! - Sending it to the consumer with a single HTTP POST
//! - Classifying the result into a [`SendOutcome`] and logging it
//!
//! Delivery is at most once: a failed send is logged and dropped, never
//! retried or queued.

use evpipe_sdk::client::{ClientError, EventClient};
use evpipe_sdk::objects::{RawEvent, SubmitEventResponse};
use kanau::processor::Processor;
use std::convert::Infallible;
use std::fmt;
use tracing::{info, warn};

/// Result of one send attempt.
#[derive(Debug)]
pub enum SendOutcome {
    /// The consumer accepted the event. `event_id` is `None` when the 2xx
    /// response body could not be understood.
    Delivered { event_id: Option<i64> },
    /// The consumer answered with a non-2xx status.
    Rejected { status: u16, body: String },
    /// No response was received.
    TransportFailure(ClientError),
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendOutcome::Delivered {
                event_id: Some(id),
            } => write!(f, "delivered (event_id {id})"),
            SendOutcome::Delivered { event_id: None } => write!(f, "delivered"),
            SendOutcome::Rejected { status, body } => write!(f, "rejected: {status} - {body}"),
            SendOutcome::TransportFailure(e) => write!(f, "transport failure: {e}"),
        }
    }
}

impl From<Result<SubmitEventResponse, ClientError>> for SendOutcome {
    fn from(result: Result<SubmitEventResponse, ClientError>) -> Self {
        match result {
            Ok(response) => SendOutcome::Delivered {
                event_id: Some(response.event_id),
            },
            Err(ClientError::Api { status, body }) => SendOutcome::Rejected {
                status: status.as_u16(),
                body,
            },
            Err(ClientError::Json(_)) => SendOutcome::Delivered { event_id: None },
            Err(e @ ClientError::Http(_)) => SendOutcome::TransportFailure(e),
        }
    }
}

/// EventSender delivers catalog events to the consumer endpoint.
#[derive(Debug, Clone)]
pub struct EventSender {
    client: EventClient,
}

impl EventSender {
    pub fn new(client: EventClient) -> Self {
        Self { client }
    }
}

impl Processor<RawEvent> for EventSender {
    type Output = SendOutcome;
    type Error = Infallible;

    async fn process(&self, event: RawEvent) -> Result<SendOutcome, Infallible> {
        let outcome = SendOutcome::from(self.client.submit(&event).await);

        match &outcome {
            SendOutcome::Delivered { event_id } => {
                info!(?event_id, event = %event, "Event sent successfully");
            }
            SendOutcome::Rejected { status, body } => {
                warn!(status, body = %body, event = %event, "Event rejected by consumer");
            }
            SendOutcome::TransportFailure(e) => {
                warn!(
                    error = %e,
                    endpoint = %self.client.endpoint(),
                    event = %event,
                    "Failed to send event"
                );
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evpipe_sdk::client::StatusCode;

    #[test]
    fn test_success_is_delivered_with_id() {
        let outcome = SendOutcome::from(Ok(SubmitEventResponse::saved(3)));
        assert!(matches!(
            outcome,
            SendOutcome::Delivered { event_id: Some(3) }
        ));
    }

    #[test]
    fn test_api_error_is_rejected() {
        let outcome = SendOutcome::from(Err(ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"detail":"Invalid JSON format"}"#.to_string(),
        }));
        assert!(matches!(
            outcome,
            SendOutcome::Rejected { status: 400, ref body } if body.contains("Invalid JSON format")
        ));
    }

    #[test]
    fn test_unparsable_success_body_is_delivered_without_id() {
        let json_error = serde_json::from_str::<SubmitEventResponse>("ok").unwrap_err();
        let outcome = SendOutcome::from(Err(ClientError::Json(json_error)));
        assert!(matches!(outcome, SendOutcome::Delivered { event_id: None }));
        assert!(outcome.is_delivered());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_failure() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = url::Url::parse(&format!("http://{addr}/event")).unwrap();
        let sender = EventSender::new(EventClient::new(endpoint));
        let outcome = sender
            .process(serde_json::json!({"event_type": "login", "event_payload": "user123"}))
            .await
            .unwrap();

        assert!(matches!(outcome, SendOutcome::TransportFailure(_)));
        assert!(!outcome.is_delivered());
    }
}
