//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DecodeError, Error};

/// Default connect/read/write timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Certificate trust policy for the transport client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsTrust {
    /// Verify certificate chains against the bundled web PKI roots and
    /// check hostnames.
    #[default]
    Verified,
    /// Accept any certificate chain and any hostname.
    ///
    /// Only meant for development against self-signed endpoints.
    TrustAll,
}

/// How much of each exchange the logging hook records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpLogLevel {
    /// No logging.
    None,
    /// Method, URL, status and elapsed time.
    #[default]
    Basic,
    /// Basic plus request and response headers.
    Headers,
    /// Headers plus request and response bodies.
    Body,
}

/// Configuration for a [`ServiceClient`](crate::ServiceClient).
///
/// The base URL is kept as given and only validated when the dispatcher is
/// first built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub tls: TlsTrust,
    #[serde(default)]
    pub log_level: HttpLogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Create a configuration with default timeout, verified TLS and basic logging.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tls: TlsTrust::default(),
            log_level: HttpLogLevel::default(),
            user_agent: None,
        }
    }

    /// Parse a configuration from JSON, filling omitted fields with defaults.
    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        serde_json::from_str(s).map_err(|e| DecodeError::Decode(e).into())
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_tls(mut self, tls: TlsTrust) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_log_level(mut self, level: HttpLogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Opt in to accepting any certificate and any hostname.
    pub fn danger_trust_all(self) -> Self {
        self.with_tls(TlsTrust::TrustAll)
    }

    /// The configured timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("https://example.test");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.tls, TlsTrust::Verified);
        assert_eq!(config.log_level, HttpLogLevel::Basic);
    }

    #[test]
    fn json_fills_defaults() {
        let config = ClientConfig::from_json_str(r#"{"base_url": "https://example.test"}"#).unwrap();
        assert_eq!(config, ClientConfig::new("https://example.test"));
    }

    #[test]
    fn json_overrides() {
        let config = ClientConfig::from_json_str(
            r#"{
                "base_url": "https://example.test",
                "timeout_secs": 30,
                "tls": "trust_all",
                "log_level": "headers",
                "user_agent": "app/1.0"
            }"#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.tls, TlsTrust::TrustAll);
        assert_eq!(config.log_level, HttpLogLevel::Headers);
        assert_eq!(config.user_agent.as_deref(), Some("app/1.0"));
    }

    #[test]
    fn json_requires_base_url() {
        assert!(ClientConfig::from_json_str("{}").is_err());
    }

    #[test]
    fn log_levels_are_ordered() {
        assert!(HttpLogLevel::Body > HttpLogLevel::Headers);
        assert!(HttpLogLevel::Headers > HttpLogLevel::Basic);
        assert!(HttpLogLevel::Basic > HttpLogLevel::None);
    }
}
