//! Configuration for Netlify API clients.
//!
//! Holds the API base URL, the personal access token, and request timeouts,
//! and validates them before a client is built.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Public Netlify REST API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.netlify.com/api/v1/";

/// Environment variable holding the personal access token.
pub const TOKEN_ENV_VAR: &str = "NETLIFY_PERSONAL_TOKEN";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV_VAR: &str = "NETLIFY_API_URL";

const fn default_request_timeout_secs() -> u64 {
    30
}

/// Configuration for a Netlify client instance.
#[derive(Debug, Validate)]
pub struct NetlifyClientConfig {
    /// API base URL; relative request paths are joined onto it
    #[validate(url)]
    pub base_url: String,

    personal_token: SecretString,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,

    /// Optional `User-Agent` override
    pub user_agent: Option<String>,
}

impl NetlifyClientConfig {
    /// Create a new client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the token is empty.
    pub fn new(
        base_url: impl Into<String>,
        personal_token: impl Into<String>,
    ) -> Result<Self, Error> {
        let personal_token: String = personal_token.into();
        if personal_token.trim().is_empty() {
            return Err(Error::ConfigError(
                "Netlify personal token must not be empty".to_string(),
            ));
        }

        let config = Self {
            base_url: base_url.into(),
            personal_token: SecretString::from(personal_token),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: None,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Configuration for the public Netlify endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty.
    pub fn with_token(personal_token: impl Into<String>) -> Result<Self, Error> {
        Self::new(DEFAULT_BASE_URL, personal_token)
    }

    /// Build a configuration from `NETLIFY_PERSONAL_TOKEN` and optional `NETLIFY_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token variable is unset or the values are invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or the values are invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_ENV_VAR)
            .ok_or_else(|| Error::ConfigError(format!("{TOKEN_ENV_VAR} is not set")))?;
        let base_url = lookup(BASE_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, token)
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The personal access token.
    #[must_use]
    pub const fn personal_token(&self) -> &SecretString {
        &self.personal_token
    }

    /// Value of the `Authorization` header.
    #[must_use]
    pub fn bearer_value(&self) -> String {
        format!("Bearer {}", self.personal_token.expose_secret())
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the base URL, making sure its path ends with `/`.
    ///
    /// Without the trailing slash, joining `sites/` onto `.../api/v1` would drop `v1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("Invalid Netlify API URL: {e}")))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}
