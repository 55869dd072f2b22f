//! Project, ticket and asset commands.
//!
//! All three kinds go through the same [`ResourceListController`]; only the
//! argument parsing in `main.rs` differs per kind.
//!
//! # Usage
//!
//! ```bash
//! itorg projects list
//! itorg projects create --name "Laptop refresh" --status planned
//! itorg tickets set-status 4 resolved
//! itorg assets delete 9
//! ```

use std::io::Write;
use std::sync::Arc;

use itorg_client::{ApiClient, ClientError, PreconditionError, ResourceListController};
use itorg_core::Resource;

use super::CommandError;
use crate::render;

/// What to do with a resource collection.
#[derive(Debug)]
pub enum Operation<R: Resource> {
    List,
    Create(R::Draft),
    SetStatus(R::Id, R::Status),
    Delete(R::Id),
}

/// Run `operation` and render the resulting list.
///
/// Mutations are refused client-side when no session token is stored,
/// before any request is sent.
///
/// # Errors
///
/// Returns `CommandError::Client` for rejected preconditions and failed API
/// calls, and `CommandError::Output` if rendering fails.
pub async fn run<R: Resource>(
    api: ApiClient,
    operation: Operation<R>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let session = Arc::clone(api.session());
    let mut controller = ResourceListController::<R>::new(api);

    match operation {
        Operation::List => {
            controller.load().await?;
        }
        Operation::Create(draft) => {
            controller.set_form(draft);
            let created = controller.create().await?;
            writeln!(out, "Created {} #{}", R::KIND.label(), created.id())?;
        }
        Operation::SetStatus(id, status) => {
            if !session.is_authed().await {
                return Err(ClientError::from(PreconditionError::NotAuthenticated).into());
            }
            // The update is built from the cached record, so the cache must be fresh.
            controller.load().await?;
            controller.update_status(id, status).await?;
            writeln!(out, "Set {} #{id} to {status}", R::KIND.label())?;
        }
        Operation::Delete(id) => {
            controller.remove(id).await?;
            writeln!(out, "Deleted {} #{id}", R::KIND.label())?;
        }
    }

    render::list(out, controller.items(), controller.is_stale())?;
    Ok(())
}
