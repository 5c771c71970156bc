use serde::{Deserialize, Serialize};
use starter_http::{DecodeError, TransportError, TransportResponse};
use thiserror::Error;

/// Classification of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The request exceeded its timeout
    #[serde(rename = "TimeoutError")]
    Timeout,
    /// The connection could not be made or broke
    #[serde(rename = "NetworkError")]
    Network,
    /// The server answered with a status that is not accepted
    #[serde(rename = "HttpError")]
    Status,
    /// The body could not be decoded as requested
    #[serde(rename = "DecodeError")]
    Decode,
    /// The request could not be built or sent for a non-network reason
    #[serde(rename = "TransportError")]
    Transport,
    /// The transport panicked
    #[serde(rename = "InternalError")]
    Internal,
}

impl FailureKind {
    /// Stable name of the kind, as serialized
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Timeout => "TimeoutError",
            Self::Network => "NetworkError",
            Self::Status => "HttpError",
            Self::Decode => "DecodeError",
            Self::Transport => "TransportError",
            Self::Internal => "InternalError",
        }
    }

    /// Whether the kind is a network-level failure
    #[must_use]
    pub const fn is_network(self) -> bool {
        matches!(self, Self::Timeout | Self::Network)
    }
}

/// A normalized request failure
///
/// Serializes as `{ name, message, data, status, isNetworkError,
/// forceFEHideEnqueueBar }` so it can be stored in the auth slice and shown by
/// the view layer unchanged.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{}: {message}", .kind.name())]
pub struct RequestFailure {
    /// Classification
    #[serde(rename = "name")]
    pub kind: FailureKind,
    /// Human-readable detail
    #[serde(default)]
    pub message: String,
    /// Response body: JSON when it parses, text otherwise
    pub data: Option<serde_json::Value>,
    /// Response status, when a response was received
    pub status: Option<u16>,
    /// Timeout or connection failure
    pub is_network_error: bool,
    /// Copied from the request descriptor
    #[serde(rename = "forceFEHideEnqueueBar")]
    pub force_fe_hide_enqueue_bar: bool,
}

impl RequestFailure {
    /// Failure of the given kind with no detail
    #[must_use]
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            message: String::new(),
            data: None,
            status: None,
            is_network_error: kind.is_network(),
            force_fe_hide_enqueue_bar: false,
        }
    }

    /// The request exceeded its timeout
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(FailureKind::Timeout).with_message("Request timed out")
    }

    /// The server answered with a status that is not accepted
    #[must_use]
    pub fn from_status(response: &TransportResponse) -> Self {
        Self {
            data: response.error_data(),
            status: Some(response.status),
            ..Self::new(FailureKind::Status).with_message(format!(
                "Request failed with status code {}",
                response.status
            ))
        }
    }

    /// An accepted response whose body could not be decoded
    #[must_use]
    pub fn from_decode(error: &DecodeError, response: &TransportResponse) -> Self {
        Self {
            data: response.error_data(),
            status: Some(response.status),
            ..Self::new(FailureKind::Decode).with_message(error.to_string())
        }
    }

    /// The transport reported an error instead of a response
    #[must_use]
    pub fn from_transport(error: &TransportError) -> Self {
        let kind = match error {
            TransportError::Timeout => FailureKind::Timeout,
            TransportError::Connect(_) | TransportError::Io(_) => FailureKind::Network,
            TransportError::InvalidRequest(_) | TransportError::Other(_) => FailureKind::Transport,
        };
        Self::new(kind).with_message(error.to_string())
    }

    /// The transport panicked
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Internal).with_message(message)
    }

    /// Stable name of the failure kind
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Set the message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the status
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the data
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the flag copied from the descriptor
    #[must_use]
    pub const fn with_force_fe_hide_enqueue_bar(mut self, enabled: bool) -> Self {
        self.force_fe_hide_enqueue_bar = enabled;
        self
    }
}
