//! Error types for Netlify API operations.
//!
//! Every failure of a request/response cycle maps to one variant here: URL
//! construction, transport, unexpected status, body read, and JSON decode.

use thiserror::Error;

/// Main error type for Netlify operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The request URL could not be built from the base URL and path
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Netlify API could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The API answered 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API answered with a status outside the accepted set
    #[error("invalid status code received {status} : {body}")]
    UnexpectedStatus {
        /// Numeric HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    BodyRead(String),

    /// The response body was not the expected JSON
    #[error("Failed to parse Netlify response: {0}")]
    ParseError(String),

    /// Request payload validation failed
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for Netlify operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::BodyRead(_) => "BODY_READ",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// HTTP status code carried by the error, if the API answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the remote object does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::BodyRead(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
