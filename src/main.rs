//! Contacts service binary.

use std::net::SocketAddr;

use contacts_service::{AppState, Config, build_app, connect_store};
use contacts_telemetry::{TelemetryConfig, init_metrics, setup_telemetry};
use tokio::signal;
use tracing::{error, info, warn};

/// Build version (injected at compile time).
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::init()?;

    setup_telemetry(&TelemetryConfig {
        log_level: config.log_level.clone(),
        json_logs: config.json_logs,
    })?;

    let metrics = match init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
            None
        }
    };

    info!(
        version = VERSION,
        backend = ?config.storage_backend,
        pid = std::process::id(),
        "Starting contacts-service"
    );

    let (store, database) = connect_store(&config).await.inspect_err(|e| {
        error!(error = %e, "Failed to open contact store");
    })?;

    let app = build_app(&config, AppState::new(store, metrics));
    let addr: SocketAddr = config.bind_address().parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, static_dir = %config.static_dir, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = database {
        database.close().await;
    }
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
