//! Vantage API client.
//!
//! Low-level HTTP transport that handles authentication, request
//! construction, and retry/backoff. Higher-level operations are implemented
//! via traits on entity types and compose through [`crate::rest::RestCall`].

use std::collections::BTreeMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Request};
use url::Url;

use crate::error::{Result, VantageError};

const USER_AGENT: &str = concat!("vantageapi/", env!("CARGO_PKG_VERSION"));

/// Configuration used to construct a [`VantageClient`].
///
/// The client copies every field at construction time, so mutating a
/// `Config` after building a client has no effect on that client.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Address of the Vantage API, of the form `example.vantagehq.com`.
    /// An address carrying an explicit scheme (`http://...`) is used as-is,
    /// which is how the test suite points a client at a local mock server.
    pub address: String,

    /// Authentication token passed as a bearer credential with all requests.
    pub token: String,

    /// Optional HTTP proxy URL.
    pub http_proxy: Option<String>,

    /// Disables TLS certificate checking. Testing only.
    pub skip_tls_verify: bool,

    /// Socket timeout for each request. `None` means unbounded.
    pub timeout: Option<Duration>,
}

/// Retry policy applied by [`VantageClient::execute`].
///
/// Only the single `retryable_status` is ever retried; it is the API's
/// backpressure signal. Everything else fails immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// The one HTTP status treated as a transient "try again later" signal.
    pub retryable_status: u16,

    /// Maximum number of retries after the initial send.
    pub max_retries: u32,

    /// Ceiling on any single backoff sleep.
    pub max_retry_duration: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retryable_status: 406,
            max_retries: 10,
            max_retry_duration: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry `attempt` (1-based): `500ms * attempt` plus a
    /// jitter in [50ms, 100ms), capped at `max_retry_duration`.
    fn backoff(&self, attempt: u32) -> Duration {
        let jitter = rand::thread_rng().gen_range(50..100u64);
        let sleep = Duration::from_millis(u64::from(attempt) * 500 + jitter);
        sleep.min(self.max_retry_duration)
    }
}

/// The transport seam every Vantage API call goes through.
///
/// Exactly two operations: build a request, execute it. Test doubles
/// implement this trait to observe or fake traffic without a network.
/// `execute` owns the retry loop, so a successful return always carries the
/// full response body of a 200-204 response.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Build a request against the API.
    ///
    /// `path` is relative to the client's base URL and must not carry a
    /// leading slash. `params` become URL query parameters, overwriting any
    /// duplicate keys already on the URL. `body` is attached verbatim as a
    /// JSON payload.
    fn build_request(
        &self,
        method: Method,
        path: &str,
        params: Option<&BTreeMap<String, String>>,
        body: Option<Bytes>,
    ) -> Result<Request>;

    /// Execute a request, retrying on the configured backpressure status,
    /// and return the response body bytes on success.
    async fn execute(&self, request: Request) -> Result<Bytes>;
}

/// Low-level Vantage API client.
///
/// Handles authentication, retry/backoff, and raw requests. Entity-specific
/// operations are implemented via the `Get`, `Create`, `Update`, `Delete`,
/// and `Find` traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool. It holds no per-call mutable state, so a single instance
/// may be shared across concurrent independent calls.
///
/// # Example
///
/// ```no_run
/// use vantageapi::{Config, VantageClient};
///
/// # fn example() -> vantageapi::Result<()> {
/// // Create from environment variables
/// let client = VantageClient::from_env()?;
///
/// // Or configure manually
/// let client = VantageClient::new(&Config {
///     address: "example.vantagehq.com".to_string(),
///     token: "your-api-token".to_string(),
///     ..Default::default()
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct VantageClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
    retry: RetryPolicy,
    debug: bool,
}

impl std::fmt::Debug for VantageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VantageClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl VantageClient {
    /// Create a client from environment variables.
    ///
    /// Uses `VANTAGE_ADDRESS` for the API address and `VANTAGE_API_TOKEN`
    /// for authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is not set.
    pub fn from_env() -> Result<Self> {
        let address = env::var("VANTAGE_ADDRESS").map_err(|_| {
            VantageError::ConfigMissing("VANTAGE_ADDRESS environment variable not set".to_string())
        })?;
        let token = env::var("VANTAGE_API_TOKEN").map_err(|_| {
            VantageError::ConfigMissing(
                "VANTAGE_API_TOKEN environment variable not set".to_string(),
            )
        })?;

        Self::new(&Config {
            address,
            token,
            ..Default::default()
        })
    }

    /// Create a new client from the given configuration.
    ///
    /// The configuration is copied; later mutation of `config` does not
    /// affect the constructed client. The base URL becomes
    /// `https://{address}/api/v2/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not parse as a URL or the proxy
    /// configuration is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        if config.address.is_empty() {
            return Err(VantageError::ConfigMissing(
                "address must be specified".to_string(),
            ));
        }

        let root = if config.address.contains("://") {
            config.address.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", config.address.trim_end_matches('/'))
        };
        let base_url = Url::parse(&format!("{root}/api/v2/"))
            .map_err(|e| VantageError::RequestBuild(e.to_string()))?;

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = &config.http_proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        if config.skip_tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(VantageError::Transport)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: config.token.clone(),
            retry: RetryPolicy::default(),
            debug: false,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable dumping each outgoing request to the tracing sink before it is
    /// sent. Troubleshooting only; does not alter behavior.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn dump_request(&self, request: &Request) {
        let body = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(String::from_utf8_lossy);
        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            headers = ?request.headers(),
            body = ?body,
            "outgoing request"
        );
    }
}

#[async_trait]
impl ApiTransport for VantageClient {
    fn build_request(
        &self,
        method: Method,
        path: &str,
        params: Option<&BTreeMap<String, String>>,
        body: Option<Bytes>,
    ) -> Result<Request> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| VantageError::RequestBuild(e.to_string()))?;

        if let Some(params) = params {
            if !params.is_empty() {
                // Set each key on the resolved URL, overwriting duplicates.
                let mut merged: BTreeMap<String, String> =
                    url.query_pairs().into_owned().collect();
                merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
                url.query_pairs_mut().clear().extend_pairs(merged.iter());
            }
        }

        let mut request = Request::new(method, url);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| VantageError::RequestBuild(e.to_string()))?;
        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            // A Bytes body keeps the request replayable across retries.
            *request.body_mut() = Some(reqwest::Body::from(body));
        }
        Ok(request)
    }

    #[tracing::instrument(
        skip_all,
        fields(method = %request.method(), url = %request.url())
    )]
    async fn execute(&self, request: Request) -> Result<Bytes> {
        if self.debug {
            self.dump_request(&request);
        }

        let mut attempt = 0u32;
        loop {
            // The body is always a fully-buffered byte payload, so cloning
            // replays the exact original bytes on every attempt.
            let req = request.try_clone().ok_or_else(|| {
                VantageError::RequestBuild("request body is not replayable".to_string())
            })?;

            let response = self.http.execute(req).await?;
            let status = response.status().as_u16();

            // 200 OK, 201 Created, 202 Accepted, 203 Non-Authoritative,
            // 204 No Content: the request was fulfilled.
            if (200..=204).contains(&status) {
                return Ok(response.bytes().await?);
            }

            if status == self.retry.retryable_status && attempt < self.retry.max_retries {
                attempt += 1;
                let sleep = self.retry.backoff(attempt);
                tracing::debug!(
                    attempt,
                    max_retries = self.retry.max_retries,
                    sleep_ms = sleep.as_millis() as u64,
                    "server signaled backpressure, retrying"
                );
                tokio::time::sleep(sleep).await;
                continue;
            }

            let message = response.text().await.unwrap_or_default();
            return Err(VantageError::Server { status, message });
        }
    }
}
