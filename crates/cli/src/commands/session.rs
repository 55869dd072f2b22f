//! Session and dashboard commands.
//!
//! # Usage
//!
//! ```bash
//! itorg login -e ops@example.com
//! itorg whoami
//! itorg health
//! itorg logout
//! ```

use std::io::Write;

use itorg_client::{ApiClient, ClientError, auth, dashboard};
use tracing::debug;

use super::CommandError;

/// Log in and persist the session token.
///
/// # Errors
///
/// Returns `CommandError::LoginFailed` if the API rejects the email, or a
/// session error if the token cannot be stored.
pub async fn login(api: &ApiClient, email: &str, out: &mut impl Write) -> Result<(), CommandError> {
    match auth::login(api, email).await {
        Ok(()) => {
            writeln!(out, "Logged in. You can now create, update and delete.")?;
            Ok(())
        }
        Err(ClientError::Transport(e)) => {
            debug!(error = %e, "Login failed");
            Err(CommandError::LoginFailed)
        }
        Err(e) => Err(e.into()),
    }
}

/// Clear the stored session token.
///
/// # Errors
///
/// Returns a session error if the token cannot be removed from storage.
pub async fn logout(api: &ApiClient, out: &mut impl Write) -> Result<(), CommandError> {
    auth::logout(api.session()).await?;
    writeln!(out, "Logged out.")?;
    Ok(())
}

/// Report whether a session token is stored.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub async fn whoami(api: &ApiClient, out: &mut impl Write) -> Result<(), CommandError> {
    if api.session().is_authed().await {
        writeln!(out, "Logged in")?;
    } else {
        writeln!(out, "Not logged in")?;
    }
    Ok(())
}

/// Print the backend health status.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub async fn health(api: &ApiClient, out: &mut impl Write) -> Result<(), CommandError> {
    let status = dashboard::backend_health(api).await;
    writeln!(out, "Backend health: {status}")?;
    Ok(())
}
