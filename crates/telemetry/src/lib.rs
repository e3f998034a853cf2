//! Logging and metrics setup for the contacts service.
//!
//! - **Tracing**: structured console logging, JSON or compact
//! - **Metrics**: Prometheus recorder backing the `/metrics` endpoint
//!
//! # Features
//! - `prometheus` (default): Prometheus metrics exporter

use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "prometheus")]
pub use metrics_exporter_prometheus::{BuildError as MetricsError, PrometheusHandle};

pub use tracing_subscriber::util::TryInitError;

/// Targets that are too chatty at the application level.
const QUIET_TARGETS: [&str; 4] = ["sqlx::query=warn", "tower=info", "hyper=info", "h2=info"];

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: String,
    /// Use JSON log format
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            json_logs: false,
        }
    }
}

/// Map a configured level name to a tracing level. Unknown names mean INFO.
#[must_use]
pub fn parse_level(name: &str) -> Level {
    match name.to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" | "WARNING" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the filter: `RUST_LOG` directives first, then the configured level
/// and the quiet targets.
#[must_use]
pub fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    QUIET_TARGETS
        .iter()
        .filter_map(|d| d.parse::<Directive>().ok())
        .fold(
            EnvFilter::from_default_env().add_directive(parse_level(&config.log_level).into()),
            |filter, directive| filter.add_directive(directive),
        )
}

/// Initialize Prometheus metrics exporter and return the handle for the /metrics endpoint.
///
/// # Errors
/// Fails if a global metrics recorder is already installed.
#[cfg(feature = "prometheus")]
pub fn init_metrics() -> Result<PrometheusHandle, MetricsError> {
    metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()
}

/// Install the global tracing subscriber.
///
/// # Errors
/// Fails if a global subscriber is already set.
pub fn setup_telemetry(config: &TelemetryConfig) -> Result<(), TryInitError> {
    let fmt_layer = if config.json_logs {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_timer(ChronoLocal::new("%H:%M:%S%.3f".to_string()))
            .compact()
            .boxed()
    };

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt_layer)
        .try_init()
}
