use super::context::RequestContext;
use super::descriptor::RequestDescriptor;
use super::failure::{FailureKind, RequestFailure};
use super::loader::{LoaderCategory, LoaderGate};
use crate::config::ClientConfig;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use starter_http::{
    Payload, Transport, TransportError, TransportRequest, TransportResponse, query, url,
};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of the transport step, before normalization
enum Attempt {
    Completed(Result<TransportResponse, TransportError>),
    TimedOut,
    Panicked(String),
}

/// Runs requests with loader bookkeeping, token injection and normalized results
///
/// The coordinator is cheap to share: clones use the same transport and the
/// same per-category in-flight counts.
///
/// # Example
///
/// ```ignore
/// let coordinator = RequestCoordinator::new(ReqwestTransport::new(), ClientConfig::from_env()?);
///
/// match coordinator.execute(RequestDescriptor::new("/api/profile"), &store).await {
///     Ok(payload) => render(payload),
///     Err(failure) if failure.is_network_error => show_offline_banner(),
///     Err(failure) => show_error(failure),
/// }
/// ```
#[derive(Debug)]
pub struct RequestCoordinator<T> {
    transport: T,
    config: ClientConfig,
    loaders: Arc<LoaderGate>,
}

impl<T: Clone> Clone for RequestCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
            loaders: Arc::clone(&self.loaders),
        }
    }
}

impl<T: Transport> RequestCoordinator<T> {
    /// Create a coordinator over a transport
    #[must_use]
    pub fn new(transport: T, config: ClientConfig) -> Self {
        let loaders = Arc::new(LoaderGate::new(config.loader_policy));
        Self {
            transport,
            config,
            loaders,
        }
    }

    /// The configuration in use
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute one request
    ///
    /// Raises the selected loader flag, sends the request and lowers the flag
    /// again whatever the outcome. Only 200-299 and 412 are accepted; every
    /// other outcome, including a panicking transport, comes back as a
    /// [`RequestFailure`] carrying the descriptor's `force_fe_hide_enqueue_bar`.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestFailure`] for timeouts, network failures, rejected
    /// statuses and undecodable bodies.
    pub async fn execute<C: RequestContext>(
        &self,
        descriptor: RequestDescriptor,
        ctx: &C,
    ) -> Result<Payload, RequestFailure> {
        self.run(descriptor, ctx, |payload, _| Ok(payload)).await
    }

    /// Execute one request and deserialize the accepted JSON body into `D`
    ///
    /// Same lifecycle as [`execute`](Self::execute). A body that is not JSON, or
    /// does not have the shape of `D`, is a decode failure that keeps the
    /// response status and body.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestFailure`] for everything [`execute`](Self::execute)
    /// rejects, and a decode failure when the body is not a `D`.
    pub async fn execute_json<D, C>(&self, descriptor: RequestDescriptor, ctx: &C) -> Result<D, RequestFailure>
    where
        D: DeserializeOwned + Send,
        C: RequestContext,
    {
        self.run(descriptor, ctx, deserialize).await
    }

    #[tracing::instrument(
        skip_all,
        name = "request_execute",
        fields(method = %descriptor.method, url = %descriptor.url)
    )]
    async fn run<C, R, F>(&self, descriptor: RequestDescriptor, ctx: &C, accept: F) -> Result<R, RequestFailure>
    where
        C: RequestContext,
        R: Send,
        F: FnOnce(Payload, u16) -> Result<R, RequestFailure> + Send,
    {
        metrics::counter!("requests.total").increment(1);

        let token = ctx.bearer_token().await;

        let category = LoaderCategory::select(&descriptor);
        let slot = match category {
            Some(category) => {
                let slot = self.loaders.enter(category);
                ctx.update_page_state(category.begin_patch(&descriptor.loader_text))
                    .await;
                Some((category, slot))
            },
            None => None,
        };

        let timeout = self.effective_timeout(&descriptor);
        let request = self.build_request(&descriptor, token.as_deref(), timeout);

        let attempt = self.attempt(request, timeout).await;
        let result = Self::settle(attempt, &descriptor, accept);

        if let Some((category, slot)) = slot {
            if slot.leave() {
                ctx.update_page_state(category.end_patch()).await;
            }
        }

        match &result {
            Ok(_) => tracing::debug!("Request succeeded"),
            Err(failure) => {
                metrics::counter!("requests.failed", "kind" => failure.name()).increment(1);
                tracing::warn!(
                    kind = failure.name(),
                    status = failure.status,
                    network = failure.is_network_error,
                    "Request failed"
                );
            },
        }

        result
    }

    fn effective_timeout(&self, descriptor: &RequestDescriptor) -> Option<Duration> {
        Some(descriptor.timeout.unwrap_or(self.config.timeout)).filter(|t| !t.is_zero())
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        token: Option<&str>,
        timeout: Option<Duration>,
    ) -> TransportRequest {
        let base = descriptor.base_url.as_deref().or(self.config.base_url.as_deref());
        let mut request = TransportRequest::new(descriptor.method, url::resolve(base, &descriptor.url));
        request.timeout = timeout;

        request.set_header("Content-Type", descriptor.content_type.clone());
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request.set_header("Authorization", format!("bearer {token}"));
        }
        for (name, value) in &descriptor.extra_headers {
            request.set_header(name.clone(), value.clone());
        }

        if descriptor.method.uses_query() {
            request.query = query::flatten(&descriptor.data);
        } else {
            request.body = Some(Value::Object(descriptor.data.clone()).to_string().into_bytes());
        }

        request
    }

    async fn attempt(&self, request: TransportRequest, timeout: Option<Duration>) -> Attempt {
        let call = match std::panic::catch_unwind(AssertUnwindSafe(|| self.transport.send(request))) {
            Ok(call) => AssertUnwindSafe(call).catch_unwind(),
            Err(panic) => return Attempt::Panicked(panic_message(panic.as_ref())),
        };

        let outcome = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => return Attempt::TimedOut,
            },
            None => call.await,
        };

        match outcome {
            Ok(result) => Attempt::Completed(result),
            Err(panic) => Attempt::Panicked(panic_message(panic.as_ref())),
        }
    }

    fn settle<R, F>(attempt: Attempt, descriptor: &RequestDescriptor, accept: F) -> Result<R, RequestFailure>
    where
        F: FnOnce(Payload, u16) -> Result<R, RequestFailure>,
    {
        let result = match attempt {
            Attempt::Completed(Ok(response)) if is_accepted(response.status) => response
                .decode(descriptor.response_type)
                .map_err(|error| RequestFailure::from_decode(&error, &response))
                .and_then(|payload| accept(payload, response.status)),
            Attempt::Completed(Ok(response)) => Err(RequestFailure::from_status(&response)),
            Attempt::Completed(Err(error)) => Err(RequestFailure::from_transport(&error)),
            Attempt::TimedOut => Err(RequestFailure::timeout()),
            Attempt::Panicked(message) => {
                tracing::error!(%message, "Transport panicked");
                Err(RequestFailure::internal(message))
            },
        };

        result.map_err(|failure| failure.with_force_fe_hide_enqueue_bar(descriptor.force_fe_hide_enqueue_bar))
    }
}

/// Deserialize an accepted payload, keeping the status on a shape mismatch
fn deserialize<D: DeserializeOwned>(payload: Payload, status: u16) -> Result<D, RequestFailure> {
    let Some(value) = payload.into_json() else {
        return Err(RequestFailure::new(FailureKind::Decode)
            .with_message("Response is not JSON")
            .with_status(status));
    };

    serde_json::from_value(value.clone()).map_err(|error| {
        RequestFailure::new(FailureKind::Decode)
            .with_message(format!("Unexpected response shape: {error}"))
            .with_status(status)
            .with_data(value)
    })
}

/// 2xx, plus 412 which the backend uses for a handled precondition
fn is_accepted(status: u16) -> bool {
    (200..300).contains(&status) || status == 412
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "transport panicked".to_string())
}
