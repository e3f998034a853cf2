//! Request metrics middleware.
//!
//! Records request count and duration with the `metrics` crate, rendered by
//! the Prometheus exporter at `/metrics`.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `http_requests_total` | Counter | `method`, `path`, `status` |
//! | `http_request_duration_seconds` | Histogram | `method`, `path`, `status` |
//!
//! `path` is the route template (`/api/contacts/{id}`) for API routes, the
//! literal path for fixed routes, and `/*` for everything else.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{Request, Response};
use tower::{Layer, Service};

/// Fixed routes reported verbatim.
const KNOWN_PATHS: &[&str] = &[
    "/",
    "/health",
    "/health/live",
    "/metrics",
    "/api/contacts",
    "/api/contacts/groups",
];

const CONTACTS_PREFIX: &str = "/api/contacts/";

/// Tower layer for request metrics collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLayer;

impl MetricsLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

/// Metrics middleware service.
#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let method = req.method().to_string();
        let path = normalize_path(req.uri().path());
        let start = Instant::now();

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let response = inner.call(req).await?;

            let labels = [
                ("method", method),
                ("path", path.to_string()),
                ("status", response.status().as_u16().to_string()),
            ];
            metrics::counter!("http_requests_total", &labels).increment(1);
            metrics::histogram!("http_request_duration_seconds", &labels)
                .record(start.elapsed().as_secs_f64());

            Ok(response)
        })
    }
}

/// Map a request path onto a bounded label set.
fn normalize_path(path: &str) -> &'static str {
    if let Some(known) = KNOWN_PATHS.iter().find(|p| **p == path) {
        return known;
    }
    match path.strip_prefix(CONTACTS_PREFIX) {
        Some(id) if !id.is_empty() && !id.contains('/') => "/api/contacts/{id}",
        _ => "/*",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_pass_through() {
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/api/contacts"), "/api/contacts");
        assert_eq!(normalize_path("/api/contacts/groups"), "/api/contacts/groups");
    }

    #[test]
    fn contact_ids_use_route_template() {
        assert_eq!(
            normalize_path("/api/contacts/0f8fad5b-d9cb-469f-a165-70867728950e"),
            "/api/contacts/{id}"
        );
        assert_eq!(normalize_path("/api/contacts/abc"), "/api/contacts/{id}");
    }

    #[test]
    fn everything_else_is_bucketed() {
        assert_eq!(normalize_path("/index.html"), "/*");
        assert_eq!(normalize_path("/api/contacts/a/b"), "/*");
        assert_eq!(normalize_path("/api/contacts/"), "/*");
    }
}
