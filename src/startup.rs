//! Server startup and wiring.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use contacts_db::{
    ConnectionMonitor, Database, DbConfig, DynContactStore, MemoryContactStore, create_pool,
};
use contacts_telemetry::PrometheusHandle;
use http::{HeaderName, Request};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};

use crate::config::{Config, StorageBackend};
use crate::middleware::{MetricsLayer, REQUEST_ID_HEADER, RequestId, RequestIdLayer};
use crate::routes::rest_routes;
use crate::services::{ContactService, contact_routes};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub contacts: ContactService,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(store: DynContactStore, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            contacts: ContactService::new(store),
            metrics,
        }
    }
}

/// Open the configured store.
///
/// Returns the database handle alongside the store when PostgreSQL is used, so
/// the caller can close the pool on shutdown.
pub async fn connect_store(config: &Config) -> anyhow::Result<(DynContactStore, Option<Database>)> {
    match config.storage_backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; contacts are lost on restart");
            Ok((Arc::new(MemoryContactStore::new()), None))
        }
        StorageBackend::Postgres => {
            let db_config = DbConfig {
                url: config.database_url(),
                pool_min: config.db_pool_min,
                pool_max: config.db_pool_max,
                connect_timeout: config.db_connect_timeout(),
            };
            info!(url = %config.redacted_database_url(), "Connecting to database");

            let monitor = ConnectionMonitor::new();
            let pool = create_pool(&db_config, &monitor).await?;
            let database = Database::new(pool, monitor);

            if config.db_run_migrations {
                database.migrate().await?;
                info!("Database migrations applied");
            }

            Ok((Arc::new(database.contacts.clone()), Some(database)))
        }
    }
}

/// Build the router with every route, the static fallback and middleware.
pub fn build_app(config: &Config, state: AppState) -> Router {
    let static_files = ServeDir::new(&config.static_dir);

    let router = rest_routes(state.clone())
        .nest("/api/contacts", contact_routes().with_state(state))
        .fallback_service(static_files);

    let cors = build_cors(config.cors_allow_origins.as_deref());
    let middleware = ServiceBuilder::new()
        .layer(RequestIdLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    let request_id = req
                        .extensions()
                        .get::<RequestId>()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request_id,
                    )
                })
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(MetricsLayer::new())
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(cors);

    router.layer(middleware)
}

fn build_cors(origins: Option<&str>) -> CorsLayer {
    let cors = match origins {
        Some(o) if o.trim() == "*" => CorsLayer::new().allow_origin(Any),
        Some(o) => {
            let origins: Vec<_> = o.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            CorsLayer::new().allow_origin(origins)
        }
        None => CorsLayer::new().allow_origin(Any),
    };

    cors.allow_headers(Any)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_methods(Any)
        .max_age(Duration::from_secs(3600))
}
