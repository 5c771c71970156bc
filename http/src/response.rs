//! Response value and body decoding

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a response body should be decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Parse as JSON (an empty body decodes to `null`)
    #[default]
    Json,
    /// UTF-8 text
    Text,
    /// Raw bytes
    Binary,
}

/// A decoded response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// JSON document
    Json(serde_json::Value),
    /// Text body
    Text(String),
    /// Raw bytes
    Binary(Vec<u8>),
}

impl Payload {
    /// The JSON document, if this payload is JSON
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) | Self::Binary(_) => None,
        }
    }

    /// Consume the payload, returning the JSON document if there is one
    #[must_use]
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) | Self::Binary(_) => None,
        }
    }
}

/// The body could not be decoded as the requested [`ResponseType`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Cannot decode response body as {expected:?}: {reason}")]
pub struct DecodeError {
    /// Requested decoding
    pub expected: ResponseType,
    /// Why decoding failed
    pub reason: String,
}

/// A response received from the server, whatever its status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Raw body
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Response with the given status and body and no headers
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// JSON response with the given status
    #[must_use]
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: value.to_string().into_bytes(),
        }
    }

    /// Whether the status is in 200-299
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode the body as requested
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when a JSON body does not parse or a text body is
    /// not valid UTF-8.
    pub fn decode(&self, response_type: ResponseType) -> Result<Payload, DecodeError> {
        match response_type {
            ResponseType::Json => {
                if self.body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Payload::Json(serde_json::Value::Null));
                }
                serde_json::from_slice(&self.body)
                    .map(Payload::Json)
                    .map_err(|e| DecodeError {
                        expected: response_type,
                        reason: e.to_string(),
                    })
            },
            ResponseType::Text => String::from_utf8(self.body.clone())
                .map(Payload::Text)
                .map_err(|e| DecodeError {
                    expected: response_type,
                    reason: e.to_string(),
                }),
            ResponseType::Binary => Ok(Payload::Binary(self.body.clone())),
        }
    }

    /// Best-effort body for error reporting
    ///
    /// JSON when the body parses, text otherwise, `None` when empty.
    #[must_use]
    pub fn error_data(&self) -> Option<serde_json::Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        serde_json::from_slice(&self.body).ok().or_else(|| {
            Some(serde_json::Value::String(
                String::from_utf8_lossy(&self.body).into_owned(),
            ))
        })
    }
}
