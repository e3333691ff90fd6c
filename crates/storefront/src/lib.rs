//! Shopfront Storefront - client for the shop's REST backend.
//!
//! Everything the storefront screens need, without the screens:
//! - [`api`] - HTTP client, response envelopes, 401 handling
//! - [`session`] - persisted token and user
//! - [`events`] - typed notifications between screens
//! - [`auth`], [`catalog`], [`cart`], [`orders`], [`profile`] - endpoint
//!   wrappers and the view state built on them
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ClientConfig::from_env()?;
//! let session = SessionStore::from_file(&config.session_file);
//! let api = ApiClient::new(&config, session, EventBus::default())?;
//!
//! let mut browser = ProductBrowser::open(api.clone(), config.page_size).await?;
//! browser.search("mug").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod orders;
pub mod profile;
pub mod session;

pub use api::{AllPages, ApiClient, Paginated};
pub use auth::{require_admin, require_user};
pub use cart::{CartBackend, CartController, LineView, Outcome, QuantityError, UpdateTicket};
pub use catalog::{BrowserMode, PageView, ProductBrowser};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind, Result};
pub use events::{AppEvent, EventBus};
pub use session::{FileBackend, MemoryBackend, PersistedSession, SessionBackend, SessionError, SessionStore};
