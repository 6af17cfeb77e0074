use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tokio::time::{sleep, timeout};

use crate::{
    retry::{self, NextStep, RetryPolicy},
    transport::{self, Payload, ReqwestTransport, Transport, TransportError, TransportRequest},
    ApiError, Body, ClientOptions, Endpoint, Method, RequestConfig, Result,
};

/// Base URL used when `PORTAL_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const HEALTH_PATH: &str = "/api/health";
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Expands `endpoint` against `base_url`.
///
/// Absolute URLs (`scheme://...`) are returned verbatim; relative paths are
/// joined with exactly one `/`.
///
/// Example: `("https://api.example.org/", "/albums")` → `"https://api.example.org/albums"`
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    if has_scheme(endpoint) {
        return endpoint.to_owned();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn has_scheme(endpoint: &str) -> bool {
    let Some((scheme, _)) = endpoint.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[derive(Clone)]
/// HTTP client for the portal REST API.
///
/// Every call runs under a per-attempt timeout, retries transient failures
/// with linear backoff, and reports any failure as an [`ApiError`].
pub struct PortalClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    default_headers: Vec<(String, String)>,
    options: ClientOptions,
}

impl<T> fmt::Debug for PortalClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .default_headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("PortalClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &headers)
            .field("options", &self.options)
            .finish()
    }
}

impl PortalClient {
    /// Creates a client that talks to `base_url` through `reqwest`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, ReqwestTransport::default())
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `PORTAL_API_URL` — API base URL, [`DEFAULT_BASE_URL`] when unset or empty
    /// - `PORTAL_API_TIMEOUT_MS`, `PORTAL_API_RETRIES`,
    ///   `PORTAL_API_RETRY_DELAY_MS` — optional overrides of [`ClientOptions`]
    ///
    /// Returns an error if a numeric override does not parse.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use portal_http::PortalClient;
    ///
    /// let api = PortalClient::from_env().expect("invalid PORTAL_API_* env vars");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> std::result::Result<Self, String> {
        let base_url = lookup("PORTAL_API_URL")
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let options = ClientOptions::default().apply_env(&lookup)?;
        Ok(Self::new(base_url).with_options(options))
    }
}

impl<T> PortalClient<T> {
    /// Creates a client over a custom [`Transport`].
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            default_headers: Vec::new(),
            options: ClientOptions::default(),
        }
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Per-request headers with the same name take precedence.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.default_headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.default_headers.push((name, value.into()));
        self
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    ///
    /// If the token already carries the `Bearer ` prefix, it is kept as is.
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let authorization = normalize_bearer_authorization(token.as_ref());
        self.with_default_header("Authorization", authorization)
    }

    /// Base URL relative endpoints are joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default timeout and retry policy.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves a catalogued [`Endpoint`] to an absolute URL.
    ///
    /// Each identifier becomes one percent-encoded path segment, so `?`, `#`
    /// or `/` inside it cannot change the request target.
    pub fn endpoint_url(&self, endpoint: &Endpoint) -> Result<String> {
        let segments = endpoint.segments()?;
        let mut url = self.parsed_base_url()?;
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::invalid_request(format!("base url cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    /// `/api/health` on the base URL's origin.
    fn health_url(&self) -> Result<String> {
        self.parsed_base_url()?
            .join(HEALTH_PATH)
            .map(Into::into)
            .map_err(|err| ApiError::invalid_request(format!("invalid health url: {err}")))
    }

    fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(self.base_url.trim())
            .map_err(|err| ApiError::invalid_request(format!("invalid base url '{}': {err}", self.base_url)))
    }
}

impl<T: Transport> PortalClient<T> {
    /// Issues one logical call and returns the parsed JSON body.
    ///
    /// A success response whose body is empty or not JSON yields `{}`.
    pub async fn request(&self, endpoint: &str, config: RequestConfig) -> Result<Value> {
        let limit = config
            .timeout
            .unwrap_or(Duration::from_millis(self.options.timeout_ms));
        let policy = RetryPolicy {
            max_retries: config.retries.unwrap_or(self.options.max_retries),
            retry_delay: config
                .retry_delay
                .unwrap_or(Duration::from_millis(self.options.retry_delay_ms)),
        };
        let request = self.prepare(endpoint, config)?;
        self.send_with_retry(request, limit, policy).await
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.request(endpoint, RequestConfig::get()).await
    }

    pub async fn post(&self, endpoint: &str, body: impl Into<Body>) -> Result<Value> {
        self.request(endpoint, RequestConfig::post().body(body)).await
    }

    pub async fn put(&self, endpoint: &str, body: impl Into<Body>) -> Result<Value> {
        self.request(endpoint, RequestConfig::put().body(body)).await
    }

    pub async fn patch(&self, endpoint: &str, body: impl Into<Body>) -> Result<Value> {
        self.request(endpoint, RequestConfig::patch().body(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value> {
        self.request(endpoint, RequestConfig::delete()).await
    }

    /// Requests `/api/health` on the base URL's origin once, with a 5 second
    /// timeout.
    ///
    /// Any failure is reported as `false`.
    pub async fn health_check(&self) -> bool {
        let prepared = self
            .health_url()
            .and_then(|url| self.prepare(&url, RequestConfig::get()));
        let outcome = match prepared {
            Ok(request) => self.attempt(request, HEALTH_TIMEOUT).await,
            Err(err) => Err(err),
        };

        #[cfg(feature = "tracing")]
        {
            if let Err(err) = &outcome {
                tracing::debug!(code = %err.code, status = err.status, "health check failed: {}", err.message);
            }
        }

        outcome.is_ok()
    }

    fn prepare(&self, endpoint: &str, config: RequestConfig) -> Result<TransportRequest> {
        if endpoint.trim().is_empty() {
            return Err(ApiError::invalid_request("endpoint must not be empty"));
        }

        let url = join_url(&self.base_url, endpoint);
        let mut headers = transport::merge_headers(&self.default_headers, &config.headers);

        let payload = match (config.method, config.body) {
            (Method::Get, _) | (_, None) => None,
            (_, Some(Body::Json(value))) => {
                let bytes = serde_json::to_vec(&value)
                    .map_err(|err| ApiError::invalid_request(format!("unserializable body: {err}")))?;
                if !transport::has_content_type(&headers) {
                    headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
                }
                Some(Payload::Json(bytes))
            }
            (_, Some(Body::Multipart(form))) => {
                transport::strip_content_type(&mut headers);
                Some(Payload::Multipart(form))
            }
        };

        Ok(TransportRequest {
            method: config.method,
            url,
            headers,
            payload,
        })
    }

    async fn send_with_retry(
        &self,
        request: TransportRequest,
        limit: Duration,
        policy: RetryPolicy,
    ) -> Result<Value> {
        let mut attempt = 0u32;
        loop {
            let error = match self.attempt(request.clone(), limit).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match retry::next_step(&error, attempt, policy) {
                NextStep::Retry(delay) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        method = %request.method,
                        url = %request.url,
                        code = %error.code,
                        status = error.status,
                        attempt = attempt + 1,
                        "retrying request after {} ms: {}",
                        delay.as_millis(),
                        error.message
                    );

                    sleep(delay).await;
                    attempt += 1;
                }
                NextStep::GiveUp => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        method = %request.method,
                        url = %request.url,
                        code = %error.code,
                        status = error.status,
                        attempts = attempt + 1,
                        "request failed: {}",
                        error.message
                    );

                    return Err(error);
                }
            }
        }
    }

    async fn attempt(&self, request: TransportRequest, limit: Duration) -> Result<Value> {
        let response = match timeout(limit, self.transport.send(request)).await {
            Err(_) => {
                let limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                return Err(ApiError::timeout(limit_ms));
            }
            Ok(Err(TransportError::InvalidRequest(err))) => {
                return Err(ApiError::invalid_request(err))
            }
            Ok(Err(err)) => return Err(ApiError::network(err)),
            Ok(Ok(response)) => response,
        };

        if !(200..300).contains(&response.status) {
            return Err(ApiError::from_response(response.status, &response.body));
        }

        Ok(serde_json::from_slice(&response.body)
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new())))
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
