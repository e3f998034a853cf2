//! Operational routes: health checks and metrics.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use contacts_db::{ConnectionInfo, ConnectionState, PingResult};
use serde::Serialize;

use crate::startup::AppState;

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check response. Degradation is reported as data, never as an error.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    message: &'static str,
    version: &'static str,
    database: DatabaseHealth,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    status: ConnectionState,
    #[serde(flatten)]
    connection: Option<ConnectionInfo>,
    ping: PingResult,
}

/// Build operational routes with the given application state.
pub fn rest_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/live", get(|| async { "OK" }))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.contacts.store();
    let ping = store.ping().await;

    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        message: "Server is running successfully!",
        version: VERSION,
        database: DatabaseHealth {
            status: store.connection_state(),
            connection: store.connection_info(),
            ping,
        },
    })
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics disabled").into_response(),
    }
}
