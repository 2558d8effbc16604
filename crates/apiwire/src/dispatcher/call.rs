//! Deferred remote calls.

use std::future::IntoFuture;
use std::marker::PhantomData;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderName, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::codec::JSON_CONTENT_TYPE;
use crate::error::{ConfigError, Error, ProtocolError};

use super::Dispatcher;

/// A remote call that has been described but not sent.
///
/// Nothing goes over the wire until the call is awaited (or [`Call::send`]
/// is called). Errors from building the call, such as an unresolvable path
/// or an unserializable body, are reported at that point too.
#[must_use = "calls do nothing unless awaited"]
pub struct Call<R> {
    dispatcher: Dispatcher,
    builder: Result<reqwest::RequestBuilder, Error>,
    _response: PhantomData<fn() -> R>,
}

impl<R> Call<R> {
    pub(super) fn new(
        dispatcher: Dispatcher,
        builder: Result<reqwest::RequestBuilder, Error>,
    ) -> Self {
        let builder = builder.map(|b| b.header(ACCEPT, "application/json"));
        Self {
            dispatcher,
            builder,
            _response: PhantomData,
        }
    }

    /// Append query parameters.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Self {
        self.builder = self.builder.map(|b| b.query(params));
        self
    }

    /// Set a request header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.and_then(|b| {
            let invalid = || ConfigError::Header {
                name: name.to_string(),
            };
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            Ok(b.header(name, value))
        });
        self
    }

    /// Send an `Authorization: Bearer` header.
    pub fn bearer_auth(mut self, token: &str) -> Self {
        self.builder = self.builder.map(|b| b.bearer_auth(token));
        self
    }

    /// Send `body` as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        let encoded = self.dispatcher.codec().encode(body);
        self.builder = self.builder.and_then(|b| {
            Ok(b.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(encoded?))
        });
        self
    }
}

impl<R: DeserializeOwned> Call<R> {
    /// Send the call and decode the response.
    pub async fn send(self) -> Result<R, Error> {
        let request = self.builder?.build()?;
        debug!(method = %request.method(), url = %request.url(), "Sending call");

        let transport = self.dispatcher.transport();
        let response = transport.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;
        transport.logger().log_response_body(&body);

        if !status.is_success() {
            return Err(ProtocolError::new(status.as_u16(), &body).into());
        }

        self.dispatcher.codec().decode(&body)
    }
}

impl<R> IntoFuture for Call<R>
where
    R: DeserializeOwned + Send + 'static,
{
    type Output = Result<R, Error>;
    type IntoFuture = BoxFuture<'static, Result<R, Error>>;

    fn into_future(self) -> Self::IntoFuture {
        self.send().boxed()
    }
}

impl<R> std::fmt::Debug for Call<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("base_url", self.dispatcher.base_url())
            .field("response", &std::any::type_name::<R>())
            .finish()
    }
}
