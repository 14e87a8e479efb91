//! Request counting for `http_requests_total`.
//!
//! Each request is labelled with its route template, never the raw path, and
//! runs inside a request context so guards and error mappers can log the
//! request id.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use tower::{Layer, Service};
use trellis_telemetry::{Metrics, with_request_context};

use crate::http::constants::HEADER_REQUEST_ID;

/// Route label for requests that matched no route (the fallback).
const UNMATCHED_ROUTE: &str = "unmatched";

/// Labels read off a request before it is handed to the inner service.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestLabels {
    route: String,
    request_id: String,
}

impl RequestLabels {
    fn from_request<B>(req: &Request<B>) -> Self {
        let route = req
            .extensions()
            .get::<MatchedPath>()
            .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
            .to_owned();
        let request_id = req
            .headers()
            .get(HEADER_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        Self { route, request_id }
    }
}

#[derive(Clone)]
pub(crate) struct RouteMetricsLayer {
    metrics: Metrics,
}

impl RouteMetricsLayer {
    pub(crate) const fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for RouteMetricsLayer {
    type Service = RouteMetrics<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RouteMetrics {
            inner,
            metrics: self.metrics.clone(),
        }
    }
}

/// Service produced by [`RouteMetricsLayer`].
#[derive(Clone)]
pub(crate) struct RouteMetrics<S> {
    inner: S,
    metrics: Metrics,
}

type BoxedResponse<R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + Send>>;

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RouteMetrics<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxedResponse<S::Response, S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let RequestLabels { route, request_id } = RequestLabels::from_request(&req);
        let metrics = self.metrics.clone();
        let pending = self.inner.call(req);

        Box::pin(with_request_context(request_id, route.clone(), async move {
            let response = pending.await?;
            metrics.inc_http_request(&route, response.status().as_u16());
            Ok(response)
        }))
    }
}
