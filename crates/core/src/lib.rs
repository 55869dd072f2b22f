//! IT Org Core - Shared domain types.
//!
//! This crate provides the types used across the IT Org portal client:
//! - `client` - Session store, API client and resource list controllers
//! - `cli` - The `itorg` command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere, including
//! the fake API server used by the integration tests.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, choice enums, resource records and field schemas

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
