//! Contact service.
//!
//! Organized by layer:
//! - `mod.rs` - `ContactService`, store-facing operations
//! - `extract.rs` - extractors that run input validation
//! - `handlers.rs` - thin axum handlers and the route table

mod extract;
mod handlers;

use contacts_core::{AppError, Contact, ContactChanges, ContactFilter, NewContact};
use contacts_db::DynContactStore;
use tracing::{info, instrument};

pub use extract::{ValidJson, ValidQuery};
pub use handlers::contact_routes;

/// Contact operations over a shared store.
///
/// Inputs are already validated; this layer adds logging and spans.
#[derive(Clone)]
pub struct ContactService {
    store: DynContactStore,
}

impl ContactService {
    #[must_use]
    pub fn new(store: DynContactStore) -> Self {
        Self { store }
    }

    /// Underlying store, used by the health check.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &DynContactStore {
        &self.store
    }

    #[instrument(skip_all)]
    pub async fn create(&self, contact: NewContact) -> Result<Contact, AppError> {
        let created = self.store.create(contact).await?;
        info!(contact_id = %created.id, group = %created.group, "Contact created");
        Ok(created)
    }

    #[instrument(skip_all, fields(search = filter.search.as_deref(), group = ?filter.group))]
    pub async fn list(&self, filter: ContactFilter) -> Result<Vec<Contact>, AppError> {
        self.store.find_all(&filter).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Contact, AppError> {
        self.store.find_one(id).await
    }

    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &str, changes: ContactChanges) -> Result<Contact, AppError> {
        let updated = self.store.update(id, changes).await?;
        info!(contact_id = %updated.id, "Contact updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        self.store.remove(id).await?;
        info!(contact_id = id, "Contact deleted");
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn groups(&self) -> Result<Vec<String>, AppError> {
        self.store.distinct_groups().await
    }
}
