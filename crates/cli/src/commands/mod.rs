//! Command implementations.

pub mod resources;
pub mod session;

use itorg_client::{ClientError, SessionError};
use thiserror::Error;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The portal client reported an error.
    #[error("{0}")]
    Client(#[from] ClientError),

    /// Login was rejected; details are logged, not shown.
    #[error("{}", itorg_client::auth::LOGIN_FAILED_MESSAGE)]
    LoginFailed,

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl From<SessionError> for CommandError {
    fn from(err: SessionError) -> Self {
        Self::Client(ClientError::Session(err))
    }
}

impl From<itorg_client::TransportError> for CommandError {
    fn from(err: itorg_client::TransportError) -> Self {
        Self::Client(ClientError::Transport(err))
    }
}
