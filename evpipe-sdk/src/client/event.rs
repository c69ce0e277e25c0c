//! Ingestion client (propagator → consumer).

use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::{RawEvent, ServiceInfo, SubmitEventResponse};

/// Typed HTTP client for the consumer's ingestion endpoint.
///
/// Every call is exactly one request. The client never retries and uses
/// the `reqwest` default timeouts.
#[derive(Debug, Clone)]
pub struct EventClient {
    http: Client,
    endpoint: Url,
}

impl EventClient {
    /// Create a new `EventClient`.
    ///
    /// * `endpoint` – full URL of the ingestion endpoint
    ///   (e.g. `http://localhost:8001/event`).
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `POST {endpoint}` – submit one event.
    pub async fn submit(&self, event: &RawEvent) -> Result<SubmitEventResponse, ClientError> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(event)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET /` on the endpoint's origin – fetch the consumer's health/info.
    pub async fn service_info(&self) -> Result<ServiceInfo, ClientError> {
        let mut url = self.endpoint.clone();
        url.set_path("/");
        url.set_query(None);

        let resp = self.http.get(url).send().await?;

        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
