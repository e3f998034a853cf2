//! Database configuration and pool creation.

use std::time::Duration;

use contacts_core::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::monitor::{ConnectionMonitor, ConnectionState};

/// Database configuration.
#[derive(Debug, Clone)]
#[must_use]
pub struct DbConfig {
    pub url: String,
    pub pool_min: u32,
    pub pool_max: u32,
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Default minimum pool connections.
    pub const DEFAULT_POOL_MIN: u32 = 1;
    /// Default maximum pool connections.
    pub const DEFAULT_POOL_MAX: u32 = 10;
    /// Default connection timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a configuration from a URL with default pool settings.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            pool_min: Self::DEFAULT_POOL_MIN,
            pool_max: Self::DEFAULT_POOL_MAX,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Create database connection pool.
///
/// Every new physical connection is reported to `monitor`, which is how the
/// health endpoint learns about (re)connects.
pub async fn create_pool(config: &DbConfig, monitor: &ConnectionMonitor) -> Result<PgPool, AppError> {
    monitor.set(ConnectionState::Connecting);

    let hook_monitor = monitor.clone();
    let result = PgPoolOptions::new()
        .min_connections(config.pool_min)
        .max_connections(config.pool_max)
        .acquire_timeout(config.connect_timeout)
        .after_connect(move |_conn, _meta| {
            let monitor = hook_monitor.clone();
            Box::pin(async move {
                tracing::debug!("Opened database connection");
                monitor.set(ConnectionState::Connected);
                Ok(())
            })
        })
        .connect(&config.url)
        .await;

    result.map_err(|e| {
        monitor.set(ConnectionState::Disconnected);
        AppError::Storage(format!("Database connection failed: {e}"))
    })
}
