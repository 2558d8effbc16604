//! Typed service proxies and their cache.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::dispatcher::Dispatcher;
use crate::error::{ConfigError, Error};

/// A typed proxy for a remote API.
///
/// Implementors hold the [`Dispatcher`] they were created with and expose
/// one method per remote operation:
///
/// ```
/// use apiwire::{Call, Dispatcher, RemoteService};
///
/// struct EchoService {
///     dispatcher: Dispatcher,
/// }
///
/// impl EchoService {
///     fn echo(&self, message: &str) -> Call<String> {
///         self.dispatcher.get(&format!("echo/{message}"))
///     }
/// }
///
/// impl RemoteService for EchoService {
///     fn create(dispatcher: Dispatcher) -> Self {
///         Self { dispatcher }
///     }
/// }
/// ```
pub trait RemoteService: Send + Sync + 'static {
    fn create(dispatcher: Dispatcher) -> Self
    where
        Self: Sized;

    /// Cache identity of this service. Defaults to the Rust type name.
    fn service_key() -> ServiceKey
    where
        Self: Sized,
    {
        ServiceKey::of::<Self>()
    }
}

/// Stable identity of a service type, used as the cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceKey(Cow<'static, str>);

impl ServiceKey {
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    /// The key derived from a type's fully qualified name.
    pub fn of<T: ?Sized>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ServiceKey {
    fn from(key: &'static str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ServiceKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

type CachedService = Arc<dyn Any + Send + Sync>;
type Slot = Arc<OnceCell<CachedService>>;

/// Concurrent cache of service proxies.
///
/// Entries are never evicted. Each key owns a slot that is filled at most
/// once; the map's shard lock is held only to find or insert the slot, never
/// while a proxy is being built. Readers of a present key never wait on a
/// construction in progress.
#[derive(Default)]
pub struct ServiceCache {
    entries: DashMap<ServiceKey, Slot>,
}

impl ServiceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached proxy without constructing one.
    pub fn get<S: Send + Sync + 'static>(&self, key: &ServiceKey) -> Result<Option<Arc<S>>, Error> {
        let Some(cached) = self.filled(key) else {
            return Ok(None);
        };
        downcast(cached, key).map(Some)
    }

    /// Return the proxy cached under `key`, constructing it with `factory`
    /// on a miss.
    ///
    /// Callers racing on the same key wait for a single construction. A
    /// failing factory caches nothing, and the next caller retries.
    /// `factory` may use the cache for other keys but must not request
    /// `key` itself.
    pub fn get_or_try_insert_with<S, F>(&self, key: ServiceKey, factory: F) -> Result<Arc<S>, Error>
    where
        S: Send + Sync + 'static,
        F: FnOnce() -> Result<S, Error>,
    {
        if let Some(service) = self.get(&key)? {
            trace!(%key, "Service cache hit");
            return Ok(service);
        }

        let slot = self.entries.entry(key.clone()).or_default().clone();
        let cached = slot.get_or_try_init(|| {
            debug!(%key, "Creating service proxy");
            factory().map(|service| Arc::new(service) as CachedService)
        })?;
        downcast(cached.clone(), &key)
    }

    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.filled(key).is_some()
    }

    /// Number of constructed proxies.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The shard read guard is released before the slot is inspected.
    fn filled(&self, key: &ServiceKey) -> Option<CachedService> {
        let slot = self.entries.get(key).map(|e| e.value().clone())?;
        slot.get().cloned()
    }
}

impl fmt::Debug for ServiceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().get().is_some())
            .map(|e| e.key().to_string())
            .collect();
        f.debug_struct("ServiceCache").field("keys", &keys).finish()
    }
}

fn downcast<S: Send + Sync + 'static>(cached: CachedService, key: &ServiceKey) -> Result<Arc<S>, Error> {
    cached.downcast::<S>().map_err(|_| {
        ConfigError::ServiceTypeMismatch {
            key: key.to_string(),
        }
        .into()
    })
}
