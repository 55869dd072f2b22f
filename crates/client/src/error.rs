//! Unified error handling for the portal client.

use itorg_core::ResourceKind;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::session::SessionError;

/// Failure of a single HTTP round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Request failed: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {payload}")]
    Status { status: StatusCode, payload: String },

    /// The API answered with a body that is not the expected JSON.
    #[error("Unexpected response body ({status}): {source}")]
    Decode {
        status: StatusCode,
        payload: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    /// HTTP status of the response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Network(_) => None,
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
        }
    }

    /// Raw response body, or the network error text when there was no response.
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            Self::Network(message) => message,
            Self::Status { payload, .. } | Self::Decode { payload, .. } => payload,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// A client-side check that failed before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// The id is not in the controller's current list.
    #[error("{kind} {id} is not in the current list")]
    ItemNotFound { kind: &'static str, id: String },

    /// A mutation was attempted without a session token.
    #[error("Login required")]
    NotAuthenticated,
}

impl PreconditionError {
    pub(crate) fn item_not_found(kind: ResourceKind, id: impl ToString) -> Self {
        Self::ItemNotFound {
            kind: kind.label(),
            id: id.to_string(),
        }
    }
}

/// Application-level error type for the portal client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP round trip failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Rejected on the client before any request.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// Session storage could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration was invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl ClientError {
    /// HTTP status behind this error, if it came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}
