//! Tower middleware shared by every route.
//!
//! Layers added through one `ServiceBuilder` run top to bottom on the request:
//! 1. `RequestIdLayer` - propagate or generate `x-request-id`
//! 2. `TraceLayer` - request span
//! 3. `MetricsLayer` - request count and latency
//! 4. `TimeoutLayer` - 408 for hung requests
//! 5. `CorsLayer` - preflight and response headers

pub mod metrics;
pub mod request_id;

pub use metrics::MetricsLayer;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
