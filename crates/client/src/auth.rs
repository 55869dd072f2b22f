//! Login and logout.
//!
//! The portal's login is a demo exchange: the API accepts an email address and
//! answers with an opaque token. Whatever the API answers is stored as-is.

use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::{SessionError, SessionStore};

/// Message shown to the user when a login attempt fails for any reason.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Log in as `email` and store the returned token in the client's session.
///
/// # Errors
///
/// Returns `ClientError::Transport` if the API rejects the login, or
/// `ClientError::Session` if the token cannot be persisted. Callers should
/// show [`LOGIN_FAILED_MESSAGE`] rather than the error detail.
#[instrument(skip(api), fields(email = %email))]
pub async fn login(api: &ApiClient, email: &str) -> Result<(), ClientError> {
    let token = api.login(email).await.inspect_err(|e| {
        warn!(error = %e, "Login rejected");
    })?;

    api.session().set_token(token).await?;
    info!("Logged in");

    Ok(())
}

/// Forget the stored token.
///
/// # Errors
///
/// Returns `SessionError` if the persisted token cannot be removed.
#[instrument(skip_all)]
pub async fn logout(session: &SessionStore) -> Result<(), SessionError> {
    session.clear_token().await?;
    info!("Logged out");
    Ok(())
}
