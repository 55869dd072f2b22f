//! Core types for the IT Org portal.
//!
//! This module provides type-safe wrappers and records for the three
//! resource kinds the portal manages.

pub mod asset;
pub mod id;
pub mod project;
pub mod resource;
pub mod status;
pub mod ticket;

pub use asset::{Asset, AssetDraft};
pub use id::*;
pub use project::{Project, ProjectDraft};
pub use resource::{FieldInput, FieldSpec, Resource, ResourceKind};
pub use status::*;
pub use ticket::{Ticket, TicketDraft};
