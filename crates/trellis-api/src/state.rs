//! Shared state handed to every handler.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use trellis_identity::{AuthService, IdentityProvider};
use trellis_mail::MailService;
use trellis_telemetry::Metrics;

/// Collaborators supplied by the binary (or by tests).
pub struct ApiDependencies {
    /// Token verification and user lookup.
    pub identity: Arc<dyn IdentityProvider>,
    /// Transactional email; `None` when SMTP is not configured.
    pub mail: Option<MailService>,
    /// Process-wide metrics registry.
    pub metrics: Metrics,
}

/// Immutable request-time state.
pub struct ApiState {
    pub(crate) app_name: String,
    pub(crate) started_at: Instant,
    pub(crate) auth: AuthService,
    pub(crate) mail: Option<MailService>,
    pub(crate) metrics: Metrics,
    pub(crate) uploads: UploadSettings,
    pub(crate) openapi_document: Arc<Value>,
}

/// Where uploads land and how they are addressed publicly.
#[derive(Debug, Clone)]
pub(crate) struct UploadSettings {
    pub(crate) dir: PathBuf,
    pub(crate) url_prefix: String,
    pub(crate) max_file_bytes: u64,
}

impl ApiState {
    pub(crate) fn new(
        app_name: String,
        dependencies: ApiDependencies,
        uploads: UploadSettings,
        openapi_document: Arc<Value>,
    ) -> Self {
        Self {
            app_name,
            started_at: Instant::now(),
            auth: AuthService::new(dependencies.identity),
            mail: dependencies.mail,
            metrics: dependencies.metrics,
            uploads,
            openapi_document,
        }
    }
}
