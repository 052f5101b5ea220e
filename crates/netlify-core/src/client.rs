//! Authenticated transport and request/response handling.
//!
//! [`ServiceClient`] owns a `reqwest` client whose default headers carry the
//! bearer token and JSON content type, so every request sent through it is
//! authenticated. [`Request`] describes one call; [`ServiceClient::send_json`]
//! and [`ServiceClient::send_unit`] execute it and either decode or discard the body.

use crate::config::NetlifyClientConfig;
use crate::query::QueryParams;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use validator::Validate;

const USER_AGENT: &str = concat!("netlify-core/", env!("CARGO_PKG_VERSION"));

/// Default idle timeout for connection pools (seconds)
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Default connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Status codes accepted as success.
pub const ACCEPTED_STATUSES: [StatusCode; 3] =
    [StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT];

/// HTTP-level client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A single API call: method, path relative to the base URL, query and body.
///
/// Identifiers go into [`Request::segment`], never into `path`: each segment is
/// percent-encoded as a single opaque path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Fixed path prefix relative to the API base URL (no leading `/`)
    pub path: String,
    /// Dynamic path segments appended after `path`
    pub segments: Vec<String>,
    /// Query parameters
    pub query: QueryParams,
    /// Encoded JSON body; `None` sends an empty body
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Create a request without query or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `PATCH` request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one path segment, e.g. a site id or variable key.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Path for logs and error messages, segments joined unencoded.
    #[must_use]
    pub fn display_path(&self) -> String {
        if self.segments.is_empty() {
            return self.path.clone();
        }
        let prefix = self.path.trim_end_matches('/');
        if prefix.is_empty() {
            self.segments.join("/")
        } else {
            format!("{prefix}/{}", self.segments.join("/"))
        }
    }

    /// Attach query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Encode `body` as JSON and attach it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the value cannot be serialized.
    pub fn with_json<B>(mut self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug)]
pub struct ServiceClientBuilder {
    config: NetlifyClientConfig,
    http_config: ClientConfig,
}

impl ServiceClientBuilder {
    /// Start a builder from a validated configuration.
    #[must_use]
    pub fn new(config: NetlifyClientConfig) -> Self {
        Self {
            config,
            http_config: ClientConfig::new(),
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration no longer validates
    /// (e.g. a timeout set out of range) or the base URL or token cannot be used.
    pub fn build(self) -> Result<ServiceClient> {
        self.config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        let base_url = self.config.parse_base_url()?;

        let mut bearer = HeaderValue::from_str(&self.config.bearer_value()).map_err(|_| {
            Error::ConfigError("Netlify personal token contains invalid characters".to_string())
        })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self.config.user_agent.as_deref().unwrap_or(USER_AGENT);

        let http = ClientBuilder::new()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(self.config.timeout())
            .connect_timeout(self.http_config.connect_timeout)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .build()
            .map_err(|err| {
                Error::ConfigError(format!("Failed to build Netlify HTTP client: {err}"))
            })?;

        Ok(ServiceClient { http, base_url })
    }
}

/// Authenticated HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: Url,
}

impl ServiceClient {
    /// Build a client from a configuration with default HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the base URL or token cannot be used.
    pub fn new(config: NetlifyClientConfig) -> Result<Self> {
        ServiceClientBuilder::new(config).build()
    }

    /// Start a builder.
    #[must_use]
    pub fn builder(config: NetlifyClientConfig) -> ServiceClientBuilder {
        ServiceClientBuilder::new(config)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Compose the absolute URL for a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the path cannot be joined or a
    /// segment is empty, `.` or `..`.
    pub fn build_url(&self, request: &Request) -> Result<Url> {
        let path = &request.path;
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid Netlify path `{path}`: {err}")))?;

        if !request.segments.is_empty() {
            if let Some(bad) = request
                .segments
                .iter()
                .find(|s| s.is_empty() || *s == "." || *s == "..")
            {
                return Err(Error::InvalidEndpoint(format!(
                    "Invalid path segment `{bad}` for Netlify path `{path}`"
                )));
            }
            url.path_segments_mut()
                .map_err(|()| {
                    Error::InvalidEndpoint(format!("Netlify base URL cannot take path `{path}`"))
                })?
                .pop_if_empty()
                .extend(&request.segments);
        }

        request.query.apply_to(&mut url);
        Ok(url)
    }

    /// Execute the request and decode the JSON body into `R`.
    ///
    /// # Errors
    ///
    /// Transport, status, body read and decode failures; see [`Error`].
    pub async fn send_json<R>(&self, request: Request) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let path = request.display_path();
        let body = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(|err| {
            Error::ParseError(format!("Failed to parse Netlify response for `{path}`: {err}"))
        })
    }

    /// Execute the request and discard the body without decoding it.
    ///
    /// # Errors
    ///
    /// Transport, status and body read failures; see [`Error`].
    pub async fn send_unit(&self, request: Request) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }

    /// Execute the request, enforce the status allow-list and return the raw body.
    ///
    /// # Errors
    ///
    /// Transport, status and body read failures; see [`Error`].
    pub async fn execute(&self, request: Request) -> Result<Vec<u8>> {
        let url = self.build_url(&request)?;

        info!(method = %request.method, path = %url.path(), "Sending Netlify request");
        debug!(
            url = %url,
            body_len = request.body.as_ref().map_or(0, Vec::len),
            "Netlify request details"
        );

        let url_path = url.path().to_string();
        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(Error::from)?;
        let status = response.status();

        if !ACCEPTED_STATUSES.contains(&status) {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), path = %url_path, "Unexpected Netlify status");
            return Err(map_status_to_error(status, text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| Error::BodyRead(err.to_string()))?;
        debug!(status = status.as_u16(), body_len = bytes.len(), "Netlify response received");

        Ok(bytes.to_vec())
    }
}

fn map_status_to_error(status: StatusCode, body: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(format!(
            "invalid status code received {} : {body}",
            status.as_u16()
        )),
        _ => Error::UnexpectedStatus {
            status: status.as_u16(),
            body,
        },
    }
}
