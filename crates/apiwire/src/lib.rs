//! apiwire - lazily configured HTTP client and typed service proxies.
//!
//! A [`ServiceClient`] holds a base URL and transport settings. The first
//! time a service proxy is requested it builds a [`TransportClient`] and a
//! [`Dispatcher`]; both are then reused, and each proxy type is built once
//! and cached for the life of the client.
//!
//! # Example
//!
//! ```no_run
//! use apiwire::{Call, Dispatcher, RemoteService, ServiceClient};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! struct UserService {
//!     dispatcher: Dispatcher,
//! }
//!
//! impl UserService {
//!     fn user(&self, id: u64) -> Call<User> {
//!         self.dispatcher.get(&format!("users/{id}"))
//!     }
//! }
//!
//! impl RemoteService for UserService {
//!     fn create(dispatcher: Dispatcher) -> Self {
//!         Self { dispatcher }
//!     }
//! }
//!
//! # async fn example() -> Result<(), apiwire::Error> {
//! let client = ServiceClient::with_timeout("https://api.example.com/", 30);
//! let users = client.service::<UserService>()?;
//! let user = users.user(7).await?;
//! println!("{}: {}", user.id, user.name);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod service;
pub mod transport;
pub mod types;

// Re-export primary types at crate root for convenience
pub use client::ServiceClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT_SECS, HttpLogLevel, TlsTrust};
pub use dispatcher::{Call, Dispatcher};
pub use error::Error;
pub use service::{RemoteService, ServiceCache, ServiceKey};
pub use transport::{Timeouts, TransportClient};
pub use types::BaseUrl;

pub use reqwest::Method;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
