//! API-synchronized resource lists.
//!
//! A [`ResourceListController`] mirrors the server's list for one resource
//! kind and owns the create-form draft for that kind. The list is a cache,
//! never a source of truth: it is replaced wholesale by every successful
//! [`load`](ResourceListController::load), and every successful mutation is
//! followed by a reload.
//!
//! # Failure policy
//!
//! - A failed mutation returns its error and does **not** reload.
//! - A failed load leaves `items` as they were and marks the list stale.
//! - A failed reload after a successful mutation is logged, marks the list
//!   stale, and does not turn the mutation into an error.
//! - Mutations require a session token and a locally known id; both are
//!   checked before any request is sent.

use itorg_core::Resource;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::api::ApiClient;
use crate::error::{ClientError, PreconditionError, TransportError};

/// In-memory mirror of one resource collection plus its create form.
#[derive(Debug)]
pub struct ResourceListController<R: Resource> {
    api: ApiClient,
    items: Vec<R>,
    form: R::Draft,
    stale: bool,
}

impl<R: Resource> ResourceListController<R> {
    /// Create an empty controller; call [`load`](Self::load) to populate it.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: Vec::new(),
            form: R::Draft::default(),
            stale: false,
        }
    }

    /// Records from the last successful load, in server order.
    #[must_use]
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Find a record in the current list.
    #[must_use]
    pub fn find(&self, id: R::Id) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// The create-form draft.
    #[must_use]
    pub const fn form(&self) -> &R::Draft {
        &self.form
    }

    /// Mutable access to the create-form draft.
    pub const fn form_mut(&mut self) -> &mut R::Draft {
        &mut self.form
    }

    /// Replace the create-form draft.
    pub fn set_form(&mut self, draft: R::Draft) {
        self.form = draft;
    }

    /// Whether the last load attempt failed, so `items` may be out of date.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    fn collection_path() -> String {
        format!("/{}", R::KIND.collection())
    }

    fn item_path(id: R::Id) -> String {
        format!("/{}/{id}", R::KIND.collection())
    }

    /// Fetch the full list and replace `items` with it.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the fetch fails. `items` keep their
    /// previous value and the list is marked stale.
    #[instrument(skip(self), fields(kind = %R::KIND))]
    pub async fn load(&mut self) -> Result<(), TransportError> {
        match self.api.get::<Vec<R>>(&Self::collection_path()).await {
            Ok(items) => {
                debug!(count = items.len(), "List loaded");
                self.items = items;
                self.stale = false;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "List load failed, keeping previous items");
                self.stale = true;
                Err(e)
            }
        }
    }

    /// Submit the create form, then reset it and reload.
    ///
    /// Returns the record as created by the server.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::NotAuthenticated` without a session, or
    /// `TransportError` if the server rejects the create. The form is kept on
    /// failure.
    #[instrument(skip(self), fields(kind = %R::KIND))]
    pub async fn create(&mut self) -> Result<R, ClientError> {
        self.ensure_authed().await?;

        let created: R = self.api.post(&Self::collection_path(), &self.form).await?;
        info!(id = %created.id(), "Created {}", R::KIND.label());

        self.form = R::Draft::default();
        self.reload_after_mutation().await;

        Ok(created)
    }

    /// Overwrite the record `id` with a copy whose status is `status`.
    ///
    /// The full cached record is sent, so every other field is written back
    /// exactly as last loaded (last write wins).
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::NotAuthenticated` without a session,
    /// `PreconditionError::ItemNotFound` if `id` is not in the current list,
    /// or `TransportError` if the server rejects the update.
    #[instrument(skip(self), fields(kind = %R::KIND, id = %id, status = %status))]
    pub async fn update_status(&mut self, id: R::Id, status: R::Status) -> Result<R, ClientError> {
        self.ensure_authed().await?;

        let mut replacement = self
            .find(id)
            .cloned()
            .ok_or_else(|| PreconditionError::item_not_found(R::KIND, id))?;
        replacement.set_status(status);

        let updated: R = self.api.put(&Self::item_path(id), &replacement).await?;
        info!("Updated {} status", R::KIND.label());

        self.reload_after_mutation().await;

        Ok(updated)
    }

    /// Delete the record `id` on the server, then reload.
    ///
    /// The id does not have to be in the current list; the server decides
    /// whether it exists.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::NotAuthenticated` without a session, or
    /// `TransportError` if the server rejects the delete.
    #[instrument(skip(self), fields(kind = %R::KIND, id = %id))]
    pub async fn remove(&mut self, id: R::Id) -> Result<(), ClientError> {
        self.ensure_authed().await?;

        let _: Value = self.api.delete(&Self::item_path(id)).await?;
        info!("Deleted {}", R::KIND.label());

        self.reload_after_mutation().await;

        Ok(())
    }

    async fn ensure_authed(&self) -> Result<(), PreconditionError> {
        if self.api.session().is_authed().await {
            Ok(())
        } else {
            Err(PreconditionError::NotAuthenticated)
        }
    }

    async fn reload_after_mutation(&mut self) {
        // load() already logged and marked the list stale.
        let _ = self.load().await;
    }
}
