//! Application span and per-request context propagation.
//!
//! # Design
//! - Request identifiers and matched routes live in task-local storage for the
//!   duration of a request so handlers and error mappers can log them.
//! - The application span carries service name, environment and build SHA.

use std::future::Future;
use std::sync::Arc;

use tracing::{Span, span::Entered};

use crate::init::build_sha;

/// Keeps the application-level span entered for the lifetime of the process.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    /// Enter the `app` span tagged with the service name and environment.
    #[must_use]
    pub fn new(service: &str, environment: &str) -> Self {
        let span: &'static Span = Box::leak(Box::new(tracing::info_span!(
            "app",
            service = %service,
            env = %environment,
            build_sha = %build_sha()
        )));
        Self {
            _guard: span.enter(),
        }
    }
}

/// Request identifier of the request currently being served, if any.
#[must_use]
pub fn current_request_id() -> Option<String> {
    ACTIVE_REQUEST_CONTEXT
        .try_with(|ctx| ctx.request_id.to_string())
        .ok()
        .filter(|id| !id.is_empty())
}

/// Matched route of the request currently being served, if any.
#[must_use]
pub fn current_route() -> Option<String> {
    ACTIVE_REQUEST_CONTEXT
        .try_with(|ctx| ctx.route.to_string())
        .ok()
}

/// Run `fut` with the given request id and route visible to [`current_request_id`]
/// and [`current_route`].
pub async fn with_request_context<Fut, T>(
    request_id: impl Into<String>,
    route: impl Into<String>,
    fut: Fut,
) -> T
where
    Fut: Future<Output = T>,
{
    let context = RequestContext {
        request_id: Arc::from(request_id.into()),
        route: Arc::from(route.into()),
    };
    ACTIVE_REQUEST_CONTEXT.scope(context, fut).await
}

#[derive(Clone)]
struct RequestContext {
    request_id: Arc<str>,
    route: Arc<str>,
}

tokio::task_local! {
    static ACTIVE_REQUEST_CONTEXT: RequestContext;
}
