//! Request-lifecycle coordination
//!
//! Every outbound call goes through [`RequestCoordinator::execute`], which:
//!
//! 1. reads the bearer token from the auth slice
//! 2. picks at most one loader category and raises its flag
//! 3. places the data in the query (`GET`) or a JSON body (everything else)
//! 4. sends through the injected transport, accepting 2xx and 412
//! 5. lowers the same loader flag on every exit path
//! 6. returns the decoded payload or a [`RequestFailure`]
//!
//! [`RequestCoordinator::execute_json`] runs the same lifecycle and
//! deserializes the accepted body into a typed value.

mod context;
mod coordinator;
mod descriptor;
mod failure;
mod loader;

pub use context::RequestContext;
pub use coordinator::RequestCoordinator;
pub use descriptor::{DEFAULT_CONTENT_TYPE, DEFAULT_LOADER_TEXT, RequestData, RequestDescriptor};
pub use failure::{FailureKind, RequestFailure};
pub use loader::{LoaderCategory, LoaderPolicy};
