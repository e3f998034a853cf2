//! Request validation for contact input.
//!
//! Each input shape is a plain deserializable struct that rejects unknown
//! fields. Implementing [`Validate`] turns it into a normalized, typed value
//! or a [`ValidationError`] listing every offending field.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::contact::{ContactChanges, ContactFilter, ContactGroup, NewContact, SortOrder};
use crate::str_ext::StrExt;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 255;
/// Maximum name length.
pub const MAX_NAME_LENGTH: usize = 255;

/// Message for an email that fails the pattern check.
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// ASCII only: `\w` in `regex` is Unicode-aware by default.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?-u:\w)+([.-]?(?-u:\w)+)*@(?-u:\w)+([.-]?(?-u:\w)+)*(\.(?-u:\w){2,3})+$")
        .expect("email pattern is valid")
});

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub description: String,
}

/// Input rejected before reaching storage. Carries one violation per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Build an error with a single field violation.
    pub fn single(field: &str, description: impl Into<String>) -> Self {
        let mut err = Self::default();
        err.push(field, description);
        err
    }

    fn push(&mut self, field: &str, description: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            description: description.into(),
        });
    }

    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self
            .violations
            .iter()
            .map(|v| v.description.as_str())
            .collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Converts raw input into a validated value.
pub trait Validate {
    type Output;

    /// Validate and normalize the input.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] with one violation per rejected field.
    fn validate(self) -> Result<Self::Output, ValidationError>;
}

/// Body of `POST /contacts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub group: Option<String>,
}

/// Body of `PATCH /contacts/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub group: Option<String>,
}

/// Query string of `GET /contacts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactQuery {
    pub search: Option<String>,
    pub group: Option<String>,
    pub sort: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

impl Validate for CreateContactRequest {
    type Output = NewContact;

    fn validate(self) -> Result<NewContact, ValidationError> {
        let mut errors = ValidationError::default();

        let name = match self.name.as_deref() {
            Some(name) => check_name(name, &mut errors),
            None => {
                errors.push("name", "name should not be empty");
                None
            }
        };
        let email = match self.email.as_deref() {
            Some(email) => check_email(email, &mut errors),
            None => {
                errors.push("email", "email should not be empty");
                None
            }
        };
        let phone = self.phone.as_deref().and_then(normalize_phone);
        let group = self
            .group
            .as_deref()
            .map(|group| check_group(group, &mut errors));

        errors.into_result(|| NewContact {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            phone,
            group: group.flatten().unwrap_or_default(),
        })
    }
}

impl Validate for UpdateContactRequest {
    type Output = ContactChanges;

    fn validate(self) -> Result<ContactChanges, ValidationError> {
        let mut errors = ValidationError::default();

        let name = self.name.as_deref().map(|n| check_name(n, &mut errors));
        let email = self.email.as_deref().map(|e| check_email(e, &mut errors));
        let phone = self.phone.as_deref().map(normalize_phone);
        let group = self.group.as_deref().map(|g| check_group(g, &mut errors));

        errors.into_result(|| ContactChanges {
            name: name.flatten(),
            email: email.flatten(),
            phone,
            group: group.flatten(),
        })
    }
}

impl Validate for ContactQuery {
    type Output = ContactFilter;

    fn validate(self) -> Result<ContactFilter, ValidationError> {
        let mut errors = ValidationError::default();

        let group = self
            .group
            .as_deref()
            .and_then(|g| check_group(g, &mut errors));
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortOrder::default(),
            Some(sort) => sort.parse::<SortOrder>().unwrap_or_else(|_| {
                errors.push("sort", "sort must be one of: asc, desc");
                SortOrder::default()
            }),
        };
        let sort_by = self
            .sort_by
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .or_str("name")
            .to_string();

        errors.into_result(|| ContactFilter {
            search: self.search.as_deref().map(str::trim).and_then(StrExt::to_opt),
            group,
            sort,
            sort_by,
        })
    }
}

/// Validate contact name. Returns the trimmed name.
fn check_name(name: &str, errors: &mut ValidationError) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        errors.push("name", "name should not be empty");
        return None;
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(
            "name",
            format!("name must not exceed {MAX_NAME_LENGTH} characters"),
        );
        return None;
    }
    Some(name.to_string())
}

/// Validate email format. Returns the trimmed, lower-cased address.
fn check_email(email: &str, errors: &mut ValidationError) -> Option<String> {
    let email = email.trim();
    if email.is_empty() {
        errors.push("email", "email should not be empty");
        return None;
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.push(
            "email",
            format!("email must not exceed {MAX_EMAIL_LENGTH} characters"),
        );
        return None;
    }
    if !EMAIL_PATTERN.is_match(email) {
        errors.push("email", INVALID_EMAIL_MESSAGE);
        return None;
    }
    Some(email.to_lowercase())
}

/// Phone is free text. An empty phone is `None`, which clears the field on update.
fn normalize_phone(phone: &str) -> Option<String> {
    phone.trim().to_opt()
}

fn check_group(group: &str, errors: &mut ValidationError) -> Option<ContactGroup> {
    group
        .trim()
        .parse()
        .map_err(|_| {
            errors.push(
                "group",
                format!("group must be one of: {}", ContactGroup::allowed_values()),
            );
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, email: &str) -> CreateContactRequest {
        CreateContactRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            ..CreateContactRequest::default()
        }
    }

    #[test]
    fn create_normalizes_and_defaults_group() {
        let contact = create("  Ann Lee ", " Ann@Example.com ").validate().unwrap();
        assert_eq!(contact.name, "Ann Lee");
        assert_eq!(contact.email, "ann@example.com");
        assert_eq!(contact.group, ContactGroup::Other);
        assert_eq!(contact.phone, None);
    }

    #[test]
    fn create_requires_name_and_email() {
        let err = CreateContactRequest::default().validate().unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["name", "email"]);
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = create("   ", "ann@example.com").validate().unwrap_err();
        assert_eq!(err.violations()[0].field, "name");
    }

    #[test]
    fn email_pattern_checks() {
        for valid in ["user@example.com", "test.user@domain.org", "a-b@mail.co.uk"] {
            assert!(create("A", valid).validate().is_ok(), "{valid}");
        }
        for invalid in ["@example.com", "user@", "nodomain", "user@example.c", "a b@x.com"] {
            let err = create("A", invalid).validate().unwrap_err();
            assert_eq!(err.violations()[0].description, INVALID_EMAIL_MESSAGE, "{invalid}");
        }
    }

    #[test]
    fn email_rejects_non_ascii() {
        for invalid in ["josé@example.com", "user@exämple.com", "user@example.ċom"] {
            let err = create("A", invalid).validate().unwrap_err();
            assert_eq!(err.violations()[0].description, INVALID_EMAIL_MESSAGE, "{invalid}");
        }
    }

    #[test]
    fn email_length_counts_characters() {
        let too_long = format!("{}@example.com", "a".repeat(MAX_EMAIL_LENGTH));
        let err = create("A", &too_long).validate().unwrap_err();
        assert_eq!(
            err.violations()[0].description,
            format!("email must not exceed {MAX_EMAIL_LENGTH} characters")
        );

        // 200 characters but 400 bytes: within the limit, rejected by the pattern instead.
        let multibyte = format!("{}@example.com", "é".repeat(200 - "@example.com".len()));
        assert_eq!(multibyte.chars().count(), 200);
        let err = create("A", &multibyte).validate().unwrap_err();
        assert_eq!(err.violations()[0].description, INVALID_EMAIL_MESSAGE);
    }

    #[test]
    fn create_rejects_unknown_group_with_allowed_values() {
        let request = CreateContactRequest {
            group: Some("Enemies".to_string()),
            ..create("Ann", "ann@example.com")
        };
        let err = request.validate().unwrap_err();
        assert_eq!(
            err.violations()[0].description,
            "group must be one of: Friends, Work, Family, Other"
        );
    }

    #[test]
    fn create_collects_every_violation() {
        let request = CreateContactRequest {
            name: Some(String::new()),
            email: Some("nope".to_string()),
            phone: None,
            group: Some("Nope".to_string()),
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.violations().len(), 3);
        assert_eq!(
            err.to_string(),
            "name should not be empty; Please enter a valid email address; group must be one of: Friends, Work, Family, Other"
        );
    }

    #[test]
    fn create_trims_phone_and_drops_empty() {
        let request = CreateContactRequest {
            phone: Some("  555-1234 ".to_string()),
            ..create("Ann", "ann@example.com")
        };
        assert_eq!(request.validate().unwrap().phone.as_deref(), Some("555-1234"));

        let request = CreateContactRequest {
            phone: Some("   ".to_string()),
            ..create("Ann", "ann@example.com")
        };
        assert_eq!(request.validate().unwrap().phone, None);
    }

    #[test]
    fn long_phone_is_accepted() {
        let phone = "1".repeat(100);
        let request = CreateContactRequest {
            phone: Some(phone.clone()),
            ..create("Ann", "ann@example.com")
        };
        assert_eq!(request.validate().unwrap().phone, Some(phone.clone()));

        let request = UpdateContactRequest {
            phone: Some(phone.clone()),
            ..UpdateContactRequest::default()
        };
        assert_eq!(request.validate().unwrap().phone, Some(Some(phone)));
    }

    #[test]
    fn create_rejects_unknown_fields() {
        let result = serde_json::from_str::<CreateContactRequest>(
            r#"{"name":"Ann","email":"ann@example.com","admin":true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn update_only_touches_supplied_fields() {
        let request = UpdateContactRequest {
            phone: Some("555-1234".to_string()),
            ..UpdateContactRequest::default()
        };
        let changes = request.validate().unwrap();
        assert_eq!(
            changes,
            ContactChanges {
                phone: Some(Some("555-1234".to_string())),
                ..ContactChanges::default()
            }
        );
    }

    #[test]
    fn update_rejects_invalid_group() {
        let request = UpdateContactRequest {
            group: Some("NotAGroup".to_string()),
            ..UpdateContactRequest::default()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.violations()[0].field, "group");
    }

    #[test]
    fn update_empty_phone_clears_it() {
        let request = UpdateContactRequest {
            phone: Some(String::new()),
            ..UpdateContactRequest::default()
        };
        assert_eq!(request.validate().unwrap().phone, Some(None));
    }

    #[test]
    fn empty_update_is_valid() {
        assert_eq!(
            UpdateContactRequest::default().validate().unwrap(),
            ContactChanges::default()
        );
    }

    #[test]
    fn query_defaults() {
        let filter = ContactQuery::default().validate().unwrap();
        assert_eq!(filter, ContactFilter::default());
    }

    #[test]
    fn query_rejects_bad_sort_and_group() {
        let query = ContactQuery {
            group: Some("Strangers".to_string()),
            sort: Some("up".to_string()),
            ..ContactQuery::default()
        };
        let err = query.validate().unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["group", "sort"]);
    }

    #[test]
    fn query_keeps_free_text_sort_by_and_blank_search() {
        let query = ContactQuery {
            search: Some("  ".to_string()),
            sort: Some("desc".to_string()),
            sort_by: Some("shoeSize".to_string()),
            ..ContactQuery::default()
        };
        let filter = query.validate().unwrap();
        assert_eq!(filter.search, None);
        assert_eq!(filter.sort, SortOrder::Desc);
        assert_eq!(filter.sort_by, "shoeSize");
    }
}
