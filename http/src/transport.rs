//! The transport seam

use crate::error::TransportError;
use crate::request::TransportRequest;
use crate::response::TransportResponse;
use std::future::Future;
use std::sync::Arc;

/// Sends one request and returns whatever response came back
///
/// Implementations must not interpret the status code: a `500` is still an
/// `Ok(TransportResponse)`. Only failures that prevented a response are errors.
///
/// # Example
///
/// ```ignore
/// let response = transport.send(TransportRequest::new(HttpMethod::Get, url)).await?;
/// assert_eq!(response.status, 200);
/// ```
pub trait Transport: Send + Sync {
    /// Send the request
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        (**self).send(request)
    }
}
