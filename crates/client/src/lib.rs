//! IT Org portal client library.
//!
//! Client-side state for the IT Org administrative portal:
//!
//! - [`SessionStore`] - the login token, persisted across runs
//! - [`ApiClient`] - HTTP transport that attaches the token to every call
//! - [`ResourceListController`] - one generic list/form controller used for
//!   projects, tickets and assets
//! - [`auth`] and [`dashboard`] - login/logout and the backend health probe
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use itorg_client::{ApiClient, ClientConfig, ResourceListController, SessionStore};
//! use itorg_core::Project;
//!
//! # async fn run() -> Result<(), itorg_client::ClientError> {
//! let config = ClientConfig::from_env()?;
//! let session = Arc::new(SessionStore::open_file(&config.session_file)?);
//! let api = ApiClient::new(&config, session)?;
//!
//! itorg_client::auth::login(&api, "ops@example.com").await?;
//!
//! let mut projects = ResourceListController::<Project>::new(api);
//! projects.load().await?;
//! projects.form_mut().name = "Laptop refresh".to_string();
//! projects.create().await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod session;

pub use api::{ApiClient, Health};
pub use config::{ClientConfig, ConfigError};
pub use controller::ResourceListController;
pub use error::{ClientError, PreconditionError, TransportError};
pub use session::{
    FileTokenStorage, MemoryTokenStorage, SessionError, SessionStore, TOKEN_KEY, TokenStorage,
};
