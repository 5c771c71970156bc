//! Outbound request value

use crate::method::HttpMethod;
use std::time::Duration;

/// A fully resolved request, ready for a [`Transport`](crate::Transport)
///
/// Headers are applied in order, so a later entry with the same name replaces
/// an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL
    pub url: String,
    /// Query-string pairs
    pub query: Vec<(String, String)>,
    /// Header pairs, in application order
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Option<Vec<u8>>,
    /// Transport-level timeout, `None` for no limit
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    /// Create a request with no query, headers or body
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Value of the last header named `name` (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Append a header, replacing any previous value with the same name
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Body as UTF-8 text, if there is a body and it is valid UTF-8
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref().and_then(|b| std::str::from_utf8(b).ok())
    }
}
