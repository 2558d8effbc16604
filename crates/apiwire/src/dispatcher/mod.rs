//! Dispatcher: turns service declarations into calls over the transport.
//!
//! A [`Dispatcher`] is bound to one base URL and one [`TransportClient`].
//! Typed service proxies are built from it with [`Dispatcher::create`], and
//! their methods describe requests with [`Dispatcher::get`],
//! [`Dispatcher::post`] and friends.

mod call;

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use crate::codec::JsonCodec;
use crate::error::Error;
use crate::service::RemoteService;
use crate::transport::TransportClient;
use crate::types::BaseUrl;

pub use call::Call;

#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    base_url: BaseUrl,
    transport: TransportClient,
    codec: JsonCodec,
}

impl Dispatcher {
    /// Create a dispatcher, validating the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BaseUrl`](crate::error::ConfigError::BaseUrl)
    /// if `base_url` is malformed.
    pub fn new(base_url: &str, transport: TransportClient) -> Result<Self, Error> {
        Ok(Self::from_parts(BaseUrl::new(base_url)?, transport))
    }

    pub fn from_parts(base_url: BaseUrl, transport: TransportClient) -> Self {
        debug!(%base_url, "Dispatcher built");
        Self {
            inner: Arc::new(DispatcherInner {
                base_url,
                transport,
                codec: JsonCodec,
            }),
        }
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.inner.base_url
    }

    pub fn transport(&self) -> &TransportClient {
        &self.inner.transport
    }

    pub fn codec(&self) -> JsonCodec {
        self.inner.codec
    }

    /// Build a service proxy bound to this dispatcher.
    ///
    /// This always constructs a new proxy; use
    /// [`ServiceClient::service`](crate::ServiceClient::service) for the
    /// cached instance.
    pub fn create<S: RemoteService>(&self) -> S {
        S::create(self.clone())
    }

    /// Describe a request with an arbitrary method.
    pub fn call<R>(&self, method: Method, path: &str) -> Call<R> {
        let builder = self
            .inner
            .base_url
            .resolve(path)
            .map(|url| self.inner.transport.request(method, url));
        Call::new(self.clone(), builder)
    }

    pub fn get<R>(&self, path: &str) -> Call<R> {
        self.call(Method::GET, path)
    }

    pub fn delete<R>(&self, path: &str) -> Call<R> {
        self.call(Method::DELETE, path)
    }

    pub fn post<B: Serialize + ?Sized, R>(&self, path: &str, body: &B) -> Call<R> {
        self.call(Method::POST, path).json(body)
    }

    pub fn put<B: Serialize + ?Sized, R>(&self, path: &str, body: &B) -> Call<R> {
        self.call(Method::PUT, path).json(body)
    }

    pub fn patch<B: Serialize + ?Sized, R>(&self, path: &str, body: &B) -> Call<R> {
        self.call(Method::PATCH, path).json(body)
    }

    /// Returns true if both handles are the same dispatcher.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.inner.base_url)
            .field("transport", &self.inner.transport)
            .finish()
    }
}
