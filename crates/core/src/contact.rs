//! Contact entity and the validated values that flow into the store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact group, a fixed enumeration stored as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactGroup {
    Friends,
    Work,
    Family,
    #[default]
    Other,
}

impl ContactGroup {
    /// Every allowed group, in declaration order.
    pub const ALL: [Self; 4] = [Self::Friends, Self::Work, Self::Family, Self::Other];

    /// Returns the string representation as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Friends => "Friends",
            Self::Work => "Work",
            Self::Family => "Family",
            Self::Other => "Other",
        }
    }

    /// Comma-separated list of allowed values, used in validation messages.
    #[must_use]
    pub fn allowed_values() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl fmt::Display for ContactGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| format!("Unknown contact group: {s}"))
    }
}

/// Sort direction for contact listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Unknown sort order: {other}")),
        }
    }
}

/// Contact field a listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    Email,
    Phone,
    Group,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parse a `sortBy` parameter. Accepts the JSON field names and their
    /// snake case spellings.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "group" => Some(Self::Group),
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "updatedAt" | "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// Column name in the `contacts` table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Group => "\"group\"",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Stored contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub group: ContactGroup,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a contact. Defaults are already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub group: ContactGroup,
}

/// Validated partial update. `None` leaves the stored field untouched.
///
/// `phone` is doubly optional: `Some(None)` clears the stored phone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub group: Option<ContactGroup>,
}

impl ContactChanges {
    /// Merge the changes into an existing record. Does not touch `updated_at`.
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(name) = &self.name {
            contact.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            contact.email.clone_from(email);
        }
        if let Some(phone) = &self.phone {
            contact.phone.clone_from(phone);
        }
        if let Some(group) = self.group {
            contact.group = group;
        }
    }
}

/// Validated listing filter.
///
/// `sort_by` stays free text; the store resolves it with [`SortField::parse`]
/// and falls back to [`SortField::Name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFilter {
    pub search: Option<String>,
    pub group: Option<ContactGroup>,
    pub sort: SortOrder,
    pub sort_by: String,
}

impl ContactFilter {
    /// Resolved sort field, falling back to `name` for unknown values.
    #[must_use]
    pub fn sort_field(&self) -> SortField {
        SortField::parse(&self.sort_by).unwrap_or_default()
    }
}

impl Default for ContactFilter {
    fn default() -> Self {
        Self {
            search: None,
            group: None,
            sort: SortOrder::Asc,
            sort_by: "name".to_string(),
        }
    }
}
