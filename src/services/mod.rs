//! HTTP service implementations.

mod contacts;

pub use contacts::{ContactService, ValidJson, ValidQuery, contact_routes};
