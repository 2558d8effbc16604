//! HTTP transport client.
//!
//! [`TransportClient`] wraps a `reqwest::Client` together with its timeout
//! settings and the logging hook. Clones share the same underlying client.

mod logging;
mod tls;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Method, Url};
use tracing::{debug, instrument};

use crate::config::{ClientConfig, HttpLogLevel};
use crate::error::{ConfigError, Error};

pub use logging::HttpLogger;

const DEFAULT_USER_AGENT: &str = concat!("apiwire/", env!("CARGO_PKG_VERSION"));

/// Per-phase timeouts. A zero duration means no timeout for that phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
    pub write: Duration,
}

impl Timeouts {
    /// The same timeout for every phase.
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            connect: timeout,
            read: timeout,
            write: timeout,
        }
    }
}

/// A shared HTTP client with timeouts, TLS trust and a logging hook applied.
#[derive(Clone)]
pub struct TransportClient {
    inner: Arc<TransportInner>,
}

struct TransportInner {
    client: reqwest::Client,
    timeouts: Timeouts,
    logger: HttpLogger,
}

impl TransportClient {
    /// Build a transport client from configuration.
    ///
    /// Performs no network I/O.
    #[instrument(skip_all, fields(timeout_secs = config.timeout_secs, tls = ?config.tls))]
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        let timeouts = Timeouts::uniform(config.timeout());
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        // reqwest has no write-timeout setting; `Timeouts::write` is kept
        // for inspection only and is not applied to the client.
        if !timeouts.connect.is_zero() {
            builder = builder.connect_timeout(timeouts.connect);
        }
        if !timeouts.read.is_zero() {
            builder = builder.read_timeout(timeouts.read);
        }
        builder = tls::apply(builder, config.tls);

        let client = builder.build().map_err(|e| ConfigError::ClientBuild {
            message: e.to_string(),
        })?;

        debug!("Transport client built");
        Ok(Self::custom(client, timeouts, config.log_level))
    }

    /// Wrap a caller-built `reqwest::Client`.
    ///
    /// `timeouts` is informational; it should describe how `client` was built.
    pub fn custom(client: reqwest::Client, timeouts: Timeouts, log_level: HttpLogLevel) -> Self {
        Self {
            inner: Arc::new(TransportInner {
                client,
                timeouts,
                logger: HttpLogger::new(log_level),
            }),
        }
    }

    pub fn timeouts(&self) -> Timeouts {
        self.inner.timeouts
    }

    pub fn logger(&self) -> &HttpLogger {
        &self.inner.logger
    }

    /// Start building a request on the underlying client.
    pub fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.inner.client.request(method, url)
    }

    /// Send a request, running the logging hook around it.
    pub async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, Error> {
        let logger = &self.inner.logger;
        logger.log_request(&request);

        let started = Instant::now();
        match self.inner.client.execute(request).await {
            Ok(response) => {
                logger.log_response(&response, started.elapsed());
                Ok(response)
            }
            Err(e) => {
                logger.log_failure(&e, started.elapsed());
                Err(e.into())
            }
        }
    }

    /// Returns true if both handles share the same underlying client.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("timeouts", &self.inner.timeouts)
            .field("log_level", &self.inner.logger.level())
            .finish()
    }
}
