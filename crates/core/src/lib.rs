//! Core library with the contact model, validation rules and error handling.
//!
//! This crate is shared by the storage layer and the HTTP surface:
//! - Contact entity and validated input values
//! - Validation of create, update and query input
//! - Error types with automatic HTTP response conversion

pub mod contact;
pub mod error;
pub mod str_ext;
pub mod validation;

pub use contact::{
    Contact, ContactChanges, ContactFilter, ContactGroup, NewContact, SortField, SortOrder,
};
pub use error::{AppError, AppResult, ErrorBody};
pub use str_ext::StrExt;
pub use validation::{
    ContactQuery, CreateContactRequest, FieldViolation, UpdateContactRequest, Validate,
    ValidationError,
};
