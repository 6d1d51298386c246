//! HTTP client setup and middleware configuration.
//!
//! Clients are reqwest clients wrapped with:
//!
//! - **Tracing**: request/response spans through `reqwest-tracing`
//! - **Retry Logic**: exponential backoff for transient failures, unless
//!   `retries` is zero
//! - **Cookies**: an optional shared jar, so several clients can ride on one
//!   signed-in session
//! - **Proxy Support** and **Custom Headers**

use reqwest::{cookie::Jar, header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::sync::Arc;
use std::time::Duration;

/// User agent sent unless the headers say otherwise.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Number of transport-level retries for transient failures.
    pub retries: u32,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Timeout of a whole request.
    pub timeout: Option<Duration>,
    /// Cookie jar shared with other clients.
    pub cookies: Option<Arc<Jar>>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            proxy: None,
            headers: None,
            timeout: Some(Duration::from_secs(60)),
            cookies: None,
        }
    }
}

/// Creates an HTTP client with middleware configuration.
///
/// # Example
///
/// ```rust
/// use folio::http::client::{create_http_client, HttpClientConfig};
///
/// let config = HttpClientConfig::default();
/// let client = create_http_client(config).unwrap();
/// ```
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut inner_client_builder = reqwest::Client::builder().user_agent(USER_AGENT);

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    if let Some(timeout) = config.timeout {
        inner_client_builder = inner_client_builder.timeout(timeout);
    }

    if let Some(jar) = config.cookies {
        inner_client_builder = inner_client_builder.cookie_provider(jar);
    }

    let inner_client = inner_client_builder.build()?;

    // Trace HTTP requests. See the tracing crate to make use of these traces.
    let mut builder = ClientBuilder::new(inner_client).with(TracingMiddleware::default());
    if config.retries > 0 {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }

    Ok(builder.build())
}
