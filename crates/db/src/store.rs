//! Storage seam between the HTTP layer and the contact backends.

use std::sync::Arc;

use async_trait::async_trait;
use contacts_core::{AppError, Contact, ContactChanges, ContactFilter, NewContact};

use crate::monitor::{ConnectionInfo, ConnectionState, PingResult};

/// Contact persistence operations.
///
/// Callers pass validated input only. Every operation is a single round trip;
/// uniqueness of the normalized email is enforced atomically by the backend.
///
/// # Errors
///
/// - `AppError::Conflict` - the email already belongs to another contact
/// - `AppError::NotFound` - no contact with the given id, or the id is malformed
/// - `AppError::Storage` - any other backend failure
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert a contact. The backend assigns id and timestamps.
    async fn create(&self, contact: NewContact) -> Result<Contact, AppError>;

    /// List contacts matching the filter, ordered as requested.
    async fn find_all(&self, filter: &ContactFilter) -> Result<Vec<Contact>, AppError>;

    /// Fetch a contact by id.
    async fn find_one(&self, id: &str) -> Result<Contact, AppError>;

    /// Merge changes into a contact and return the updated record.
    async fn update(&self, id: &str, changes: ContactChanges) -> Result<Contact, AppError>;

    /// Delete a contact.
    async fn remove(&self, id: &str) -> Result<(), AppError>;

    /// Distinct group names currently in use, sorted.
    async fn distinct_groups(&self) -> Result<Vec<String>, AppError>;

    /// Last known connection state.
    fn connection_state(&self) -> ConnectionState;

    /// Database name, host and port, when the backend is a remote server.
    fn connection_info(&self) -> Option<ConnectionInfo> {
        None
    }

    /// Check the backend with a trivial round trip. Never fails.
    async fn ping(&self) -> PingResult;
}

/// Shared trait object handed to request handlers.
pub type DynContactStore = Arc<dyn ContactStore>;
