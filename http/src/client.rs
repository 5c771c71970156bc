//! `reqwest`-backed transport

use crate::error::TransportError;
use crate::request::TransportRequest;
use crate::response::TransportResponse;
use crate::transport::Transport;
use reqwest::Client;

/// Production [`Transport`] over a shared `reqwest::Client`
///
/// The client keeps its own connection pool, so clones are cheap and share
/// connections.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a default client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport over an existing client
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let TransportRequest {
            method,
            url,
            query,
            headers,
            body,
            timeout,
        } = request;

        let mut builder = self.client.request(method.into(), &url);

        if !query.is_empty() {
            builder = builder.query(&query);
        }
        for (name, value) in &headers {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        tracing::trace!(%method, %url, "Sending request");

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::trace!(status, bytes = body.len(), "Received response");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
