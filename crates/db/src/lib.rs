//! Contact persistence with SQLx.
//!
//! Provides:
//! - Connection pool management via [`create_pool`]
//! - The [`ContactStore`] seam used by the HTTP layer
//! - A PostgreSQL-backed [`ContactRepository`] and an in-process
//!   [`MemoryContactStore`]
//! - Connection health tracking via [`ConnectionMonitor`]
//!
//! # Example
//!
//! ```ignore
//! use contacts_db::{ConnectionMonitor, Database, DbConfig, create_pool};
//!
//! let monitor = ConnectionMonitor::new();
//! let pool = create_pool(&DbConfig::from_url("postgres://localhost/contacts"), &monitor).await?;
//! let db = Database::new(pool, monitor);
//! db.migrate().await?;
//!
//! let contact = db.contacts.find_one("0f8fad5b-d9cb-469f-a165-70867728950e").await?;
//! ```

mod memory;
mod models;
mod monitor;
mod repository;
mod store;

use contacts_core::AppError;

// =============================================================================
// Internal helpers
// =============================================================================

/// Name of the unique index guarding normalized emails.
const EMAIL_UNIQUE_INDEX: &str = "contacts_email_key";

/// Database error wrapper for ergonomic error conversion.
///
/// Wraps `sqlx::Error` so repository methods can use `?`. This is the only
/// place that inspects the engine-specific duplicate-key signal.
#[derive(Debug)]
struct DbError(sqlx::Error);

impl From<sqlx::Error> for DbError {
    #[inline]
    fn from(e: sqlx::Error) -> Self {
        Self(e)
    }
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match &e.0 {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                match db.constraint() {
                    Some(EMAIL_UNIQUE_INDEX) => Self::conflict("email"),
                    Some(other) => Self::Conflict(format!("Duplicate value for {other}")),
                    None => Self::Conflict("Duplicate value".to_string()),
                }
            }
            _ => Self::Storage(e.0.to_string()),
        }
    }
}

// =============================================================================
// Public exports
// =============================================================================

pub use memory::MemoryContactStore;
pub use models::ContactRow;
pub use monitor::{ConnectionInfo, ConnectionMonitor, ConnectionState, PingResult};
pub use repository::{ContactRepository, Database, DbConfig, create_pool};
pub use store::{ContactStore, DynContactStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_become_storage_errors() {
        let err = AppError::from(DbError(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, AppError::Storage(_)));

        let err = AppError::from(DbError(sqlx::Error::RowNotFound));
        assert!(matches!(err, AppError::Storage(_)));
    }
}
