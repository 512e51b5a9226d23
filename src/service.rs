//! HTTP access to the service's JSON endpoints: root metadata, dynamic
//! attribution feeds, and identify queries.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::attribution::{AttributionFeed, Contributor};
use crate::identify::{IdentifyRequest, IdentifyResponse, PopupContent};
use crate::{LayerError, Result};

/// Shared HTTP client reused across all service requests. Building it once
/// avoids TLS and connection pool setup per request.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("arclayer/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("failed to build reqwest client")
});

/// Transport seam for service requests, substitutable in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET for `url` with the given query pairs and parses the
    /// response body as JSON.
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value>;
}

/// Transport backed by the shared reqwest client.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = HTTP_CLIENT.get(url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(LayerError::Service(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }
        Ok(response.json().await?)
    }
}

/// Descriptive metadata from the service root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    pub current_version: Option<f64>,
    pub map_name: Option<String>,
    pub description: Option<String>,
    pub copyright_text: Option<String>,
    pub capabilities: Option<String>,
}

/// Client for the service's JSON endpoints.
///
/// Generic over [`Transport`] so tests can substitute canned responses; the
/// default construction talks to the network through the shared client.
pub struct ServiceClient<T: Transport = HttpTransport> {
    transport: T,
}

impl ServiceClient<HttpTransport> {
    pub fn new() -> Self {
        Self {
            transport: HttpTransport,
        }
    }
}

impl Default for ServiceClient<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> ServiceClient<T> {
    /// Wraps a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Fetches descriptive metadata from the service root.
    pub async fn metadata(&self, service_url: &str) -> Result<ServiceMetadata> {
        let body = self
            .transport
            .get_json(service_url, &[("f", "json".to_string())])
            .await?;
        into_typed(body)
    }

    /// Fetches a dynamic attribution feed and returns its contributors.
    pub async fn contributors(&self, feed_url: &str) -> Result<Vec<Contributor>> {
        let body = self.transport.get_json(feed_url, &[]).await?;
        let feed: AttributionFeed = into_typed(body)?;
        log::debug!(
            "attribution feed listed {} contributors",
            feed.contributors.len()
        );
        Ok(feed.contributors)
    }

    /// Executes an identify request.
    pub async fn identify(&self, request: &IdentifyRequest) -> Result<IdentifyResponse> {
        let query = request.params.to_query()?;
        let body = self.transport.get_json(&request.url, &query).await?;
        into_typed(body)
    }

    /// Identify convenience that treats any failure as "nothing to show".
    pub async fn identify_popup(&self, request: &IdentifyRequest) -> Option<PopupContent> {
        match self.identify(request).await {
            Ok(response) => PopupContent::from_results(request.position, &response),
            Err(e) => {
                log::warn!("Identify request failed: {}", e);
                None
            }
        }
    }
}

/// The server reports failures in a JSON `error` body with HTTP 200, so the
/// status check alone is not enough.
fn into_typed<D: DeserializeOwned>(body: Value) -> Result<D> {
    if let Some(error) = body.get("error") {
        return Err(LayerError::Service(error.to_string()));
    }
    Ok(serde_json::from_value(body)?)
}
