//! Connection health tracking for the `/health` endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

/// Datastore connection state as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Connecting,
    Disconnecting,
    Unknown,
}

impl ConnectionState {
    const fn to_u8(self) -> u8 {
        match self {
            Self::Disconnected => 0,
            Self::Connected => 1,
            Self::Connecting => 2,
            Self::Disconnecting => 3,
            Self::Unknown => 255,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Disconnected,
            1 => Self::Connected,
            2 => Self::Connecting,
            3 => Self::Disconnecting,
            _ => Self::Unknown,
        }
    }
}

/// Where the datastore lives, for the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    #[serde(rename = "database", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub host: String,
    pub port: u16,
}

/// Result of a datastore round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl PingResult {
    #[must_use]
    pub fn ok(latency_ms: u64) -> Self {
        Self {
            success: true,
            message: "Database ping successful".to_string(),
            latency_ms: Some(latency_ms),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            latency_ms: None,
        }
    }
}

/// Shared connection state, written by pool hooks and pings.
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    state: Arc<AtomicU8>,
}

impl ConnectionMonitor {
    /// New monitor in the `connecting` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(ConnectionState::Connecting.to_u8())),
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Record a new state. Transitions are logged once.
    pub fn set(&self, state: ConnectionState) {
        let previous = ConnectionState::from_u8(self.state.swap(state.to_u8(), Ordering::AcqRel));
        if previous == state {
            return;
        }
        match state {
            ConnectionState::Connected if previous == ConnectionState::Disconnected => {
                tracing::info!("Database reconnected");
            }
            ConnectionState::Connected => tracing::info!("Database connected"),
            ConnectionState::Disconnected => tracing::warn!("Database disconnected"),
            ConnectionState::Disconnecting => tracing::info!("Database disconnecting"),
            ConnectionState::Connecting | ConnectionState::Unknown => {}
        }
    }

    /// Fold a ping outcome into the tracked state.
    pub fn observe_ping(&self, ping: &PingResult) {
        if ping.success {
            self.set(ConnectionState::Connected);
        } else if self.state() != ConnectionState::Disconnecting {
            self.set(ConnectionState::Disconnected);
        }
    }
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_connecting() {
        assert_eq!(ConnectionMonitor::new().state(), ConnectionState::Connecting);
    }

    #[test]
    fn clones_share_state() {
        let monitor = ConnectionMonitor::new();
        let observer = monitor.clone();
        monitor.set(ConnectionState::Connected);
        assert_eq!(observer.state(), ConnectionState::Connected);
    }

    #[test]
    fn failed_ping_marks_disconnected_and_success_recovers() {
        let monitor = ConnectionMonitor::new();
        monitor.observe_ping(&PingResult::failed("connection refused"));
        assert_eq!(monitor.state(), ConnectionState::Disconnected);
        monitor.observe_ping(&PingResult::ok(3));
        assert_eq!(monitor.state(), ConnectionState::Connected);
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&ConnectionState::Disconnecting).unwrap();
        assert_eq!(json, "\"disconnecting\"");
    }

    #[test]
    fn connection_info_uses_database_key() {
        let info = ConnectionInfo {
            name: Some("contacts".to_string()),
            host: "db.internal".to_string(),
            port: 5432,
        };
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            serde_json::json!({"database": "contacts", "host": "db.internal", "port": 5432})
        );
    }
}
