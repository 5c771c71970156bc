use starter_http::{HttpMethod, ResponseType};
use std::time::Duration;

/// Request data: a JSON object sent as query pairs or as the body
pub type RequestData = serde_json::Map<String, serde_json::Value>;

/// Default `Content-Type` header
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Default page loader text for a request
pub const DEFAULT_LOADER_TEXT: &str = "loading";

/// Everything the coordinator needs to run one request
///
/// Built with [`RequestDescriptor::new`] and the `with_*` setters:
///
/// ```ignore
/// let descriptor = RequestDescriptor::new("/api/auth/login")
///     .with_method(HttpMethod::Post)
///     .with_data(credentials)
///     .with_auth_loader(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Path (resolved against the base URL) or absolute URL
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Query data for `GET`, JSON body otherwise
    pub data: RequestData,
    /// Timeout; `None` uses the configured default, zero disables it
    pub timeout: Option<Duration>,
    /// `Content-Type` header value
    pub content_type: String,
    /// How to decode a successful response
    pub response_type: ResponseType,
    /// Base URL; `None` uses the configured one
    pub base_url: Option<String>,
    /// Use the auth-form loader
    pub auth_loader: bool,
    /// Use the modal loader
    pub modal_loader: bool,
    /// Use the page loader
    pub loader: bool,
    /// Text for the page loader
    pub loader_text: String,
    /// Copied onto a failure unchanged, for the view layer
    pub force_fe_hide_enqueue_bar: bool,
    /// Headers applied after the computed ones, overriding them
    pub extra_headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// `GET` request for `url` with the page loader and every other default
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            data: RequestData::new(),
            timeout: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            response_type: ResponseType::Json,
            base_url: None,
            auth_loader: false,
            modal_loader: false,
            loader: true,
            loader_text: DEFAULT_LOADER_TEXT.to_string(),
            force_fe_hide_enqueue_bar: false,
            extra_headers: Vec::new(),
        }
    }

    /// Set the method
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the data
    #[must_use]
    pub fn with_data(mut self, data: RequestData) -> Self {
        self.data = data;
        self
    }

    /// Set the timeout (zero disables it)
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the `Content-Type`
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Set the response decoding
    #[must_use]
    pub const fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Toggle the auth-form loader
    #[must_use]
    pub const fn with_auth_loader(mut self, enabled: bool) -> Self {
        self.auth_loader = enabled;
        self
    }

    /// Toggle the modal loader
    #[must_use]
    pub const fn with_modal_loader(mut self, enabled: bool) -> Self {
        self.modal_loader = enabled;
        self
    }

    /// Toggle the page loader
    #[must_use]
    pub const fn with_loader(mut self, enabled: bool) -> Self {
        self.loader = enabled;
        self
    }

    /// Set the page loader text
    #[must_use]
    pub fn with_loader_text(mut self, text: impl Into<String>) -> Self {
        self.loader_text = text.into();
        self
    }

    /// Set the flag copied onto failures
    #[must_use]
    pub const fn with_force_fe_hide_enqueue_bar(mut self, enabled: bool) -> Self {
        self.force_fe_hide_enqueue_bar = enabled;
        self
    }

    /// Add a header applied after the computed ones
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }
}
