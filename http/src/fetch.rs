//! Loader-free fetch for server-side callers
//!
//! Unlike the request coordinator this helper touches no store: it sends one
//! JSON request, treats every status outside 200-299 as an error, and logs the
//! error before returning it.

use crate::error::FetchError;
use crate::method::HttpMethod;
use crate::query;
use crate::request::TransportRequest;
use crate::transport::Transport;
use serde_json::{Map, Value};
use std::time::Duration;

/// Default timeout for [`fetch_json`]
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A server-side JSON request
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Absolute URL
    pub url: String,
    /// HTTP method (default `GET`)
    pub method: HttpMethod,
    /// Query data for `GET`, JSON body otherwise
    pub data: Option<Map<String, Value>>,
    /// Extra headers, applied after `Content-Type`
    pub headers: Vec<(String, String)>,
    /// Request timeout
    pub timeout: Duration,
}

impl FetchRequest {
    /// `GET` request for `url` with the default timeout
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            data: None,
            headers: Vec::new(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Set the method
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the request data
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn into_transport_request(self) -> TransportRequest {
        let mut request = TransportRequest::new(self.method, self.url);
        request.timeout = Some(self.timeout);
        request.set_header("Content-Type", "application/json");
        for (name, value) in self.headers {
            request.set_header(name, value);
        }

        if let Some(data) = self.data {
            if self.method.uses_query() {
                request.query = query::flatten(&data);
            } else {
                request.body = Some(Value::Object(data).to_string().into_bytes());
            }
        }

        request
    }
}

/// Send a JSON request and parse the JSON response
///
/// # Errors
///
/// - [`FetchError::Status`] for any status outside 200-299
/// - [`FetchError::Transport`] when no response was received
/// - [`FetchError::Decode`] when the body is not JSON
pub async fn fetch_json<T: Transport>(transport: &T, request: FetchRequest) -> Result<Value, FetchError> {
    let url = request.url.clone();

    let result = send_json(transport, request).await;
    if let Err(error) = &result {
        tracing::error!(%url, %error, "Server fetch error");
    }

    result
}

async fn send_json<T: Transport>(transport: &T, request: FetchRequest) -> Result<Value, FetchError> {
    let response = transport.send(request.into_transport_request()).await?;

    if !response.is_success() {
        return Err(FetchError::Status {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }

    serde_json::from_slice(&response.body).map_err(|e| FetchError::Decode(e.to_string()))
}
