//! Row types for the `contacts` table.

use chrono::{DateTime, Utc};
use contacts_core::{AppError, Contact, ContactGroup};
use sqlx::FromRow;
use uuid::Uuid;

/// Column list shared by every query returning whole contacts.
pub(crate) const CONTACT_COLUMNS: &str =
    r#"id, name, email, phone, "group", created_at, updated_at"#;

/// Raw contact row. `group` is TEXT in the database and parsed on conversion.
#[derive(Debug, Clone, FromRow)]
pub struct ContactRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub group: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = AppError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let group = row
            .group
            .parse::<ContactGroup>()
            .map_err(AppError::Storage)?;
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            group,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Convert a batch of rows, failing on the first corrupt one.
pub(crate) fn into_contacts(rows: Vec<ContactRow>) -> Result<Vec<Contact>, AppError> {
    rows.into_iter().map(Contact::try_from).collect()
}
