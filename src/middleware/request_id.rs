//! Request ID propagation for log correlation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::{HeaderValue, Request, Response};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header name for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Maximum length accepted from a client-supplied request ID.
const MAX_REQUEST_ID_LENGTH: usize = 64;

/// Request ID for the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(Arc<str>);

impl RequestId {
    /// Generate a new random request ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accept a client-supplied value when it is short, non-empty and visible ASCII.
    fn accept(value: &str) -> Option<Self> {
        let valid = !value.is_empty()
            && value.len() <= MAX_REQUEST_ID_LENGTH
            && value.bytes().all(|b| b.is_ascii_graphic());
        valid.then(|| Self(value.into()))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tower layer for request ID propagation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Request ID middleware service.
#[derive(Debug, Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestIdMiddleware<S>
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

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let request_id = extract_or_generate(&req);
        let header = HeaderValue::from_str(request_id.as_str()).ok();
        req.extensions_mut().insert(request_id);

        // Take the service that was driven to readiness, leave a fresh clone.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            if let Some(value) = header {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            Ok(response)
        })
    }
}

fn extract_or_generate<T>(req: &Request<T>) -> RequestId {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(RequestId::accept)
        .unwrap_or_else(RequestId::generate)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use tower::{ServiceBuilder, ServiceExt, service_fn};

    use super::*;

    async fn echo(req: Request<()>) -> Result<Response<String>, Infallible> {
        let id = req
            .extensions()
            .get::<RequestId>()
            .map(ToString::to_string)
            .unwrap_or_default();
        Ok(Response::new(id))
    }

    #[tokio::test]
    async fn generates_id_when_missing() {
        let svc = ServiceBuilder::new().layer(RequestIdLayer::new()).service_fn(echo);
        let response = svc.oneshot(Request::new(())).await.unwrap();

        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        assert_eq!(header, *response.body());
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[tokio::test]
    async fn propagates_client_id() {
        let svc = RequestIdLayer::new().layer(service_fn(echo));
        let req = Request::builder()
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(())
            .unwrap();
        let response = svc.oneshot(req).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
        assert_eq!(response.body(), "abc-123");
    }

    #[test]
    fn rejects_oversized_or_blank_ids() {
        assert!(RequestId::accept("").is_none());
        assert!(RequestId::accept(&"x".repeat(MAX_REQUEST_ID_LENGTH + 1)).is_none());
        assert!(RequestId::accept("has space").is_none());
        assert_eq!(RequestId::accept("ok-1").unwrap().as_str(), "ok-1");
    }
}
