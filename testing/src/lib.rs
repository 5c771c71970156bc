//! # Starter Testing
//!
//! Testing utilities for the starter state container and request coordinator.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - [`MockTransport`]: scripted transport that records requests
//! - [`init_tracing`]: opt-in log output for test runs
//!
//! ## Example
//!
//! ```ignore
//! use starter_testing::{MockReply, MockTransport};
//!
//! #[tokio::test]
//! async fn test_login() {
//!     let transport = MockTransport::new()
//!         .route("/api/auth/login", MockReply::json(200, &json!({"user": {}, "token": "t"})));
//!     let coordinator = RequestCoordinator::new(transport.clone(), ClientConfig::default());
//!
//!     let session = login_user(&store, &coordinator, credentials).await.unwrap();
//!     assert_eq!(session.token, "t");
//! }
//! ```

pub mod transport;

pub use reducer_test::{ReducerTest, assertions};
pub use transport::{MockReply, MockTransport};

/// Install a test-friendly `tracing` subscriber
///
/// Honors `RUST_LOG`; output is captured by the test harness. Safe to call from
/// every test, only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
