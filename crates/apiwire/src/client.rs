//! The lazily initialized service client.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::service::{RemoteService, ServiceCache, ServiceKey};
use crate::transport::TransportClient;

/// Owns at most one transport client, one dispatcher and a cache of service
/// proxies, all built on first use.
///
/// Construction performs no I/O and no validation; a malformed base URL is
/// reported by the first call that needs the dispatcher. Every accessor
/// takes `&self`, so a client can be shared across threads behind an `Arc`.
/// Overrides take `&mut self` and therefore happen before any shared use.
pub struct ServiceClient {
    config: ClientConfig,
    transport: OnceCell<TransportClient>,
    dispatcher: OnceCell<Dispatcher>,
    services: OnceCell<ServiceCache>,
}

impl ServiceClient {
    /// Create a client with the default 15 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(base_url))
    }

    /// Create a client with a timeout in seconds for connect, read and write.
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self::from_config(ClientConfig::new(base_url).with_timeout(timeout_secs))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: OnceCell::new(),
            dispatcher: OnceCell::new(),
            services: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport client, built from the configuration on first access.
    pub fn transport_client(&self) -> Result<&TransportClient, Error> {
        self.transport
            .get_or_try_init(|| TransportClient::from_config(&self.config))
    }

    /// Replace the transport client.
    ///
    /// A dispatcher that has already been built keeps the client it was
    /// built with.
    pub fn set_transport_client(&mut self, client: TransportClient) {
        if self.dispatcher.get().is_some() {
            debug!("Dispatcher already built; it keeps its previous transport client");
        }
        self.transport = OnceCell::with_value(client);
    }

    /// The dispatcher, bound to the base URL and the current transport
    /// client, built on first access.
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    pub fn dispatcher(&self) -> Result<&Dispatcher, Error> {
        self.dispatcher.get_or_try_init(|| {
            let transport = self.transport_client()?.clone();
            Dispatcher::new(&self.config.base_url, transport)
        })
    }

    /// Replace the dispatcher.
    ///
    /// Proxies already in the cache keep the dispatcher they were built with.
    pub fn set_dispatcher(&mut self, dispatcher: Dispatcher) {
        self.dispatcher = OnceCell::with_value(dispatcher);
    }

    /// The cached proxy for `S`, created through the dispatcher on first use.
    pub fn service<S: RemoteService>(&self) -> Result<Arc<S>, Error> {
        self.service_with(S::service_key(), S::create)
    }

    /// The proxy cached under `key`, created with `factory` on first use.
    ///
    /// `factory` must not call back into this client's service cache.
    #[instrument(skip_all, fields(service = tracing::field::Empty))]
    pub fn service_with<S, F>(&self, key: impl Into<ServiceKey>, factory: F) -> Result<Arc<S>, Error>
    where
        S: Send + Sync + 'static,
        F: FnOnce(Dispatcher) -> S,
    {
        let key = key.into();
        tracing::Span::current().record("service", key.as_str());

        self.services
            .get_or_init(ServiceCache::new)
            .get_or_try_insert_with(key, || {
                let dispatcher = self.dispatcher()?.clone();
                Ok(factory(dispatcher))
            })
    }

    /// Number of cached service proxies.
    pub fn cached_services(&self) -> usize {
        self.services.get().map_or(0, ServiceCache::len)
    }
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("config", &self.config)
            .field("transport", &self.transport.get())
            .field("dispatcher", &self.dispatcher.get())
            .field("cached_services", &self.cached_services())
            .finish()
    }
}
