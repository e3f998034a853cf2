//! Contact repository for database operations on `contacts`.

use std::time::Instant;

use async_trait::async_trait;
use contacts_core::{AppError, Contact, ContactChanges, ContactFilter, NewContact, SortField};
use sqlx::postgres::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::query::find_all_query;
use crate::DbError;
use crate::models::{CONTACT_COLUMNS, ContactRow, into_contacts};
use crate::monitor::{ConnectionInfo, ConnectionMonitor, ConnectionState, PingResult};
use crate::store::ContactStore;

/// Contact repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: PgPool,
    monitor: ConnectionMonitor,
}

impl ContactRepository {
    #[must_use]
    pub const fn new(pool: PgPool, monitor: ConnectionMonitor) -> Self {
        Self { pool, monitor }
    }
}

/// Parse a path id. Malformed ids cannot exist in the table, so they are
/// reported the same way as missing ones.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found("Contact", id))
}

#[async_trait]
impl ContactStore for ContactRepository {
    #[instrument(skip_all)]
    async fn create(&self, contact: NewContact) -> Result<Contact, AppError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            INSERT INTO contacts (name, email, phone, "group")
            VALUES ($1, $2, $3, $4)
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(contact.phone.as_deref())
        .bind(contact.group.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError)?;

        Contact::try_from(row)
    }

    #[instrument(skip_all, fields(sort_by = %filter.sort_by))]
    async fn find_all(&self, filter: &ContactFilter) -> Result<Vec<Contact>, AppError> {
        if SortField::parse(&filter.sort_by).is_none() {
            debug!(sort_by = %filter.sort_by, "Unknown sort field, ordering by name");
        }

        let rows = find_all_query(filter)
            .build_query_as::<ContactRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(DbError)?;

        into_contacts(rows)
    }

    #[instrument(skip(self))]
    async fn find_one(&self, id: &str) -> Result<Contact, AppError> {
        let uuid = parse_id(id)?;

        sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1"
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError)?
        .ok_or_else(|| AppError::not_found("Contact", id))
        .and_then(Contact::try_from)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: &str, changes: ContactChanges) -> Result<Contact, AppError> {
        let uuid = parse_id(id)?;
        let phone_supplied = changes.phone.is_some();

        sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            UPDATE contacts
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   phone = CASE WHEN $4 THEN $5 ELSE phone END,
                   "group" = COALESCE($6, "group"),
                   updated_at = now()
             WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(uuid)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(phone_supplied)
        .bind(changes.phone.flatten())
        .bind(changes.group.map(|g| g.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError)?
        .ok_or_else(|| AppError::not_found("Contact", id))
        .and_then(Contact::try_from)
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: &str) -> Result<(), AppError> {
        let uuid = parse_id(id)?;

        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(DbError)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Contact", id));
        }
        Ok(())
    }

    #[instrument(skip_all)]
    async fn distinct_groups(&self) -> Result<Vec<String>, AppError> {
        let groups = sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT "group" FROM contacts ORDER BY "group""#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError)?;
        Ok(groups)
    }

    fn connection_state(&self) -> ConnectionState {
        if self.pool.is_closed() {
            return ConnectionState::Disconnected;
        }
        self.monitor.state()
    }

    fn connection_info(&self) -> Option<ConnectionInfo> {
        let options = self.pool.connect_options();
        Some(ConnectionInfo {
            name: options.get_database().map(ToString::to_string),
            host: options.get_host().to_string(),
            port: options.get_port(),
        })
    }

    async fn ping(&self) -> PingResult {
        if self.pool.is_closed() {
            return PingResult::failed("Database not connected");
        }

        let started = Instant::now();
        let ping = match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => {
                let latency = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                PingResult::ok(latency)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                PingResult::failed(e.to_string())
            }
        };
        self.monitor.observe_ping(&ping);
        ping
    }
}
