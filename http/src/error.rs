//! Error types for the HTTP boundary

use thiserror::Error;

/// Errors a [`Transport`](crate::Transport) can report
///
/// A transport only reports failures that prevented a response from being
/// received. Any response, whatever its status, is returned as a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within its timeout
    #[error("Request timed out")]
    Timeout,

    /// The connection could not be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The connection broke while sending or receiving
    #[error("I/O error: {0}")]
    Io(String),

    /// The request could not be built (bad URL, bad header, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other transport failure
    #[error("Transport failed: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether the failure happened at the network level
    ///
    /// Timeouts and connection failures count; malformed requests do not.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connect(_) | Self::Io(_))
    }
}

/// An HTTP method string that is not one of the supported verbs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported HTTP method: {0:?}")]
pub struct MethodParseError(pub String);

/// Errors returned by [`fetch_json`](crate::fetch::fetch_json)
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a status outside 200-299
    #[error("HTTP error! status: {status}")]
    Status {
        /// Response status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request never produced a response
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not valid JSON
    #[error("Response parsing failed: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else if err.is_body() || err.is_request() {
            Self::Io(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}
