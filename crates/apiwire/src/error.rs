//! Error types for the apiwire library.
//!
//! Configuration problems are deferred: they surface the first time a
//! transport client, dispatcher or service proxy is built, never at
//! [`ServiceClient`](crate::ServiceClient) construction.

use std::fmt;
use thiserror::Error;

/// The unified error type for apiwire operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration detected while lazily building a component.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A request or response body could not be converted to or from JSON.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL is malformed or unsupported.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// A request path could not be resolved against the base URL.
    #[error("invalid path '{path}': {reason}")]
    Path { path: String, reason: String },

    /// A header name or value is not valid HTTP.
    #[error("invalid header '{name}'")]
    Header { name: String },

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {message}")]
    ClientBuild { message: String },

    /// A service key is already cached with a different service type.
    #[error("service key '{key}' is registered with a different type")]
    ServiceTypeMismatch { key: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// A non-success HTTP response.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body, if it was valid UTF-8 and non-empty.
    pub body: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref body) = self.body {
            write!(f, ": {}", body)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error from a status and raw body bytes.
    pub fn new(status: u16, body: &[u8]) -> Self {
        let body = std::str::from_utf8(body)
            .ok()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { status, body }
    }

    /// Check if the server rejected the request's credentials.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    /// Check if the status is in the 5xx range.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// JSON conversion errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Serializing a request body failed.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserializing a response body failed.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}
