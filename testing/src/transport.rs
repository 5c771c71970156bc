//! Scripted transport for coordinator tests
//!
//! `MockTransport` answers requests from a script instead of the network and
//! records every request it received, so tests can assert on headers, query
//! pairs and bodies.

use futures::FutureExt;
use futures::future::BoxFuture;
use starter_http::{Transport, TransportError, TransportRequest, TransportResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// What the mock does with one request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this response
    Respond(TransportResponse),
    /// Fail with this transport error
    Fail(TransportError),
    /// Wait (on the tokio clock), then apply the inner reply
    Delay(Duration, Box<MockReply>),
    /// Panic inside the transport
    Panic,
}

impl MockReply {
    /// JSON response with the given status
    #[must_use]
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::Respond(TransportResponse::json(status, value))
    }

    /// Raw response with the given status and body
    #[must_use]
    pub fn status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::Respond(TransportResponse::new(status, body))
    }

    /// Delay this reply
    #[must_use]
    pub fn after(self, delay: Duration) -> Self {
        Self::Delay(delay, Box::new(self))
    }
}

#[derive(Debug, Default)]
struct Script {
    routes: Vec<(String, MockReply)>,
    queue: VecDeque<MockReply>,
    requests: Vec<TransportRequest>,
}

/// A [`Transport`] that replies from a script
///
/// Replies are chosen in this order:
/// 1. the first route whose suffix matches the request URL (routes are reusable)
/// 2. the next queued reply (each used once)
/// 3. a `404` with an empty body
///
/// Clones share the same script and request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
}

impl MockTransport {
    /// Create a transport with an empty script
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer URLs ending in `suffix` with `reply`
    #[must_use]
    pub fn route(self, suffix: impl Into<String>, reply: MockReply) -> Self {
        self.lock().routes.push((suffix.into(), reply));
        self
    }

    /// Queue a one-shot reply
    #[must_use]
    pub fn reply(self, reply: MockReply) -> Self {
        self.lock().queue.push_back(reply);
        self
    }

    /// Every request received so far, in arrival order
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.lock().requests.clone()
    }

    /// The most recent request
    #[must_use]
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.lock().requests.last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_reply(&self, request: &TransportRequest) -> MockReply {
        let mut script = self.lock();
        script.requests.push(request.clone());

        if let Some((_, reply)) = script
            .routes
            .iter()
            .find(|(suffix, _)| request.url.ends_with(suffix.as_str()))
        {
            return reply.clone();
        }

        script
            .queue
            .pop_front()
            .unwrap_or_else(|| MockReply::status(404, Vec::new()))
    }
}

fn play(reply: MockReply) -> BoxFuture<'static, Result<TransportResponse, TransportError>> {
    async move {
        match reply {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(error) => Err(error),
            MockReply::Delay(delay, inner) => {
                tokio::time::sleep(delay).await;
                play(*inner).await
            },
            #[allow(clippy::panic)] // scripted failure
            MockReply::Panic => panic!("scripted transport panic"),
        }
    }
    .boxed()
}

impl Transport for MockTransport {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl std::future::Future<Output = Result<TransportResponse, TransportError>> + Send {
        let reply = self.next_reply(&request);
        play(reply)
    }
}
