//! In-process contact store for local development and tests.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use contacts_core::{
    AppError, Contact, ContactChanges, ContactFilter, NewContact, SortField, SortOrder,
};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::monitor::{ConnectionState, PingResult};
use crate::store::ContactStore;

/// Contact store kept in memory. Data is lost on restart.
///
/// Uniqueness checks and writes happen under one write lock, so concurrent
/// creates with the same email cannot both succeed.
#[derive(Debug, Default)]
pub struct MemoryContactStore {
    contacts: RwLock<Vec<Contact>>,
}

impl MemoryContactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(contacts: &[Contact], email: &str, except: Option<Uuid>) -> bool {
    contacts
        .iter()
        .any(|c| Some(c.id) != except && c.email.eq_ignore_ascii_case(email))
}

fn position(contacts: &[Contact], id: &str) -> Result<usize, AppError> {
    Uuid::parse_str(id)
        .ok()
        .and_then(|uuid| contacts.iter().position(|c| c.id == uuid))
        .ok_or_else(|| AppError::not_found("Contact", id))
}

fn matches(contact: &Contact, filter: &ContactFilter, needle: Option<&str>) -> bool {
    let by_name = needle.is_none_or(|n| contact.name.to_lowercase().contains(n));
    let by_group = filter.group.is_none_or(|g| contact.group == g);
    by_name && by_group
}

/// Absent phones sort after present ones, as NULLs do in PostgreSQL.
fn compare_phone(a: Option<&String>, b: Option<&String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &Contact, b: &Contact, field: SortField) -> Ordering {
    match field {
        // Case-folded first, like a PostgreSQL locale collation.
        SortField::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        SortField::Email => a.email.cmp(&b.email),
        SortField::Phone => compare_phone(a.phone.as_ref(), b.phone.as_ref()),
        SortField::Group => a.group.as_str().cmp(b.group.as_str()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn create(&self, contact: NewContact) -> Result<Contact, AppError> {
        let mut contacts = self.contacts.write().await;
        if email_taken(&contacts, &contact.email, None) {
            return Err(AppError::conflict("email"));
        }

        let now = Utc::now();
        let created = Contact {
            id: Uuid::new_v4(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            group: contact.group,
            created_at: now,
            updated_at: now,
        };
        contacts.push(created.clone());
        Ok(created)
    }

    async fn find_all(&self, filter: &ContactFilter) -> Result<Vec<Contact>, AppError> {
        let field = SortField::parse(&filter.sort_by).unwrap_or_else(|| {
            debug!(sort_by = %filter.sort_by, "Unknown sort field, ordering by name");
            SortField::Name
        });
        let needle = filter.search.as_deref().map(str::to_lowercase);

        let mut found: Vec<Contact> = self
            .contacts
            .read()
            .await
            .iter()
            .filter(|c| matches(c, filter, needle.as_deref()))
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            let primary = compare(a, b, field);
            let primary = if filter.sort == SortOrder::Desc { primary.reverse() } else { primary };
            primary.then_with(|| a.id.cmp(&b.id))
        });
        Ok(found)
    }

    async fn find_one(&self, id: &str) -> Result<Contact, AppError> {
        let contacts = self.contacts.read().await;
        let index = position(&contacts, id)?;
        Ok(contacts[index].clone())
    }

    async fn update(&self, id: &str, changes: ContactChanges) -> Result<Contact, AppError> {
        let mut contacts = self.contacts.write().await;
        let index = position(&contacts, id)?;

        if let Some(email) = &changes.email {
            if email_taken(&contacts, email, Some(contacts[index].id)) {
                return Err(AppError::conflict("email"));
            }
        }

        let contact = &mut contacts[index];
        changes.apply_to(contact);
        contact.updated_at = Utc::now();
        Ok(contact.clone())
    }

    async fn remove(&self, id: &str) -> Result<(), AppError> {
        let mut contacts = self.contacts.write().await;
        let index = position(&contacts, id)?;
        contacts.remove(index);
        Ok(())
    }

    async fn distinct_groups(&self) -> Result<Vec<String>, AppError> {
        let contacts = self.contacts.read().await;
        let mut groups: Vec<String> = contacts.iter().map(|c| c.group.to_string()).collect();
        groups.sort();
        groups.dedup();
        Ok(groups)
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }

    async fn ping(&self) -> PingResult {
        PingResult::ok(0)
    }
}
