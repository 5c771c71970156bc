//! Client configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//!
//! | Variable          | Default             |
//! |-------------------|---------------------|
//! | `API_BASE_URL`    | unset (paths used as given) |
//! | `API_TIMEOUT_MS`  | `20000` (`0` disables the timeout) |
//! | `LOADER_POLICY`   | `last-writer-wins` (or `ref-counted`) |

use crate::request::LoaderPolicy;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Errors raised while reading configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

/// Settings shared by every request a coordinator executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL for relative request paths
    pub base_url: Option<String>,
    /// Timeout used when a descriptor does not set one
    pub timeout: Duration,
    /// How concurrent requests of one loader category share the flag
    pub loader_policy: LoaderPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            loader_policy: LoaderPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults; an empty `API_BASE_URL`
    /// counts as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `API_TIMEOUT_MS` is not a
    /// number or `LOADER_POLICY` names no known policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("API_BASE_URL").ok().filter(|url| !url.trim().is_empty());

        let timeout = match env::var("API_TIMEOUT_MS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidValue {
                    key: "API_TIMEOUT_MS",
                    value,
                    reason: "expected milliseconds as a non-negative integer",
                })?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        let loader_policy = match env::var("LOADER_POLICY") {
            Ok(value) => value.parse().map_err(|()| ConfigError::InvalidValue {
                key: "LOADER_POLICY",
                value,
                reason: "expected `last-writer-wins` or `ref-counted`",
            })?,
            Err(_) => LoaderPolicy::default(),
        };

        Ok(Self {
            base_url,
            timeout,
            loader_policy,
        })
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the default timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the loader policy
    #[must_use]
    pub const fn with_loader_policy(mut self, loader_policy: LoaderPolicy) -> Self {
        self.loader_policy = loader_policy;
        self
    }
}
