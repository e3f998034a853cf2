//! Database repository layer with connection pooling for the contacts table.
//!
//! # Error Handling
//!
//! All repository methods return `Result<T, AppError>` where errors are:
//! - `AppError::Storage` - Database connection or query failures
//! - `AppError::NotFound` - Requested contact does not exist
//! - `AppError::Conflict` - Unique email constraint violated

mod config;
mod contact;
mod query;

use contacts_core::AppError;
use sqlx::postgres::PgPool;

use crate::monitor::{ConnectionMonitor, ConnectionState};

pub use config::{DbConfig, create_pool};
pub use contact::ContactRepository;

/// Combined database context.
#[derive(Debug, Clone)]
pub struct Database {
    pub contacts: ContactRepository,
    pool: PgPool,
    monitor: ConnectionMonitor,
}

impl Database {
    /// Creates a new database context with all repositories.
    #[must_use]
    pub fn new(pool: PgPool, monitor: ConnectionMonitor) -> Self {
        Self {
            contacts: ContactRepository::new(pool.clone(), monitor.clone()),
            pool,
            monitor,
        }
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("Migration failed: {e}")))
    }

    /// Close every pooled connection, reporting the transition to the monitor.
    pub async fn close(&self) {
        self.monitor.set(ConnectionState::Disconnecting);
        self.pool.close().await;
        self.monitor.set(ConnectionState::Disconnected);
    }
}
