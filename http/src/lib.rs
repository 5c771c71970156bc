//! # Starter HTTP
//!
//! The network boundary used by the request coordinator.
//!
//! The coordinator never talks to `reqwest` directly. It builds a
//! [`TransportRequest`] and hands it to an injected [`Transport`]; tests swap
//! in a scripted transport, production uses [`ReqwestTransport`].
//!
//! ## Components
//!
//! - [`HttpMethod`]: the five supported verbs, parsed strictly
//! - [`TransportRequest`] / [`TransportResponse`]: plain request and response values
//! - [`ResponseType`] / [`Payload`]: how a response body is decoded
//! - [`query`]: flattening of a JSON object into query-string pairs
//! - [`url`]: base URL resolution
//! - [`fetch`]: a loader-free fetch helper for server-side callers

pub mod client;
pub mod error;
pub mod fetch;
pub mod method;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;
pub mod url;

pub use client::ReqwestTransport;
pub use error::{FetchError, MethodParseError, TransportError};
pub use method::HttpMethod;
pub use request::TransportRequest;
pub use response::{DecodeError, Payload, ResponseType, TransportResponse};
pub use transport::Transport;
