//! # Starter App
//!
//! State and request core of the starter web application.
//!
//! - [`state`]: the loading (page) and auth slices, composed into one store
//! - [`request`]: the request-lifecycle coordinator that wraps every outbound
//!   call with loader transitions, bearer-token injection and normalized failures
//! - [`session`]: the login flow built on the coordinator
//! - [`presentation`]: the full-screen page loader view model
//! - [`config`]: client configuration from the environment
//! - [`api`]: backend endpoint paths
//!
//! ## Example
//!
//! ```ignore
//! use starter_app::{ClientConfig, RequestCoordinator, build_store, session::login_user};
//! use starter_http::ReqwestTransport;
//!
//! let store = build_store();
//! let coordinator = RequestCoordinator::new(ReqwestTransport::new(), ClientConfig::from_env()?);
//!
//! let session = login_user(&store, &coordinator, credentials).await?;
//! assert!(store.state(|s| s.auth.is_authenticated).await);
//! ```

pub mod api;
pub mod config;
pub mod presentation;
pub mod request;
pub mod session;
pub mod state;

pub use config::{ClientConfig, ConfigError};
pub use request::{
    LoaderCategory, LoaderPolicy, RequestContext, RequestCoordinator, RequestData, RequestDescriptor,
    RequestFailure,
};
pub use state::{AppAction, AppReducer, AppState, AppStore, build_store};
