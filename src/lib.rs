//! Contacts service: HTTP backend for managing a contact list.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! drive [`startup::build_app`] directly.

pub mod config;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod startup;

pub use config::{Config, ConfigError, StorageBackend};
pub use startup::{AppState, build_app, connect_store};
