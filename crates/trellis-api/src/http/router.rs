//! Router construction and server host for the API.

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Component, Path};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};
use tracing::{Span, info};
use trellis_config::AppConfig;
use trellis_telemetry::{
    build_sha, persist_openapi, propagate_request_id_layer, set_request_id_layer,
};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::auth::{require_admin, require_authenticated, require_super_admin};
use crate::http::constants::{HEADER_REQUEST_ID, OPENAPI_JSON_PATH, PUBLIC_MOUNT};
use crate::http::docs::{openapi_document_handler, swagger_ui};
use crate::http::errors::{handle_panic, normalize_bare_errors, not_found};
use crate::http::health::{health, metrics, welcome};
use crate::http::mail::send_email;
use crate::http::profile::{admin_role, me, super_admin_role};
use crate::http::security::{SecurityHeaders, apply_security_headers, cors_layer};
use crate::http::telemetry::RouteMetricsLayer;
use crate::http::uploads::upload_files;
use crate::openapi::openapi_document;
use crate::state::{ApiDependencies, ApiState, UploadSettings};

/// Axum router wrapper that hosts the Trellis API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build the layered router from configuration and collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the `OpenAPI` document cannot be rendered or
    /// persisted, or the upload directory cannot be created.
    pub fn new(config: &AppConfig, dependencies: ApiDependencies) -> ApiServerResult<Self> {
        let document = serde_json::to_value(openapi_document())
            .map_err(|source| ApiServerError::OpenApiRender { source })?;
        if let Some(path) = &config.openapi_path {
            persist_openapi(path, &document).map_err(|source| ApiServerError::OpenApiPersist {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "openapi document written");
        }

        let uploads = Self::upload_settings(config)?;
        let telemetry = dependencies.metrics.clone();
        let state = Arc::new(ApiState::new(
            config.app_name.clone(),
            dependencies,
            uploads,
            Arc::new(document),
        ));
        let security = Arc::new(SecurityHeaders::from_config(&config.security));

        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(propagate_request_id_layer())
            .layer(trace_layer)
            .layer(RouteMetricsLayer::new(telemetry))
            .layer(middleware::from_fn_with_state(
                security,
                apply_security_headers,
            ))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(cors_layer(&config.cors))
            .layer(middleware::from_fn(normalize_bare_errors));

        let router = Self::build_router(&state, &config.assets.static_root)
            .fallback(not_found)
            .layer(layered)
            .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
            .with_state(state);

        Ok(Self { router })
    }

    fn upload_settings(config: &AppConfig) -> ApiServerResult<UploadSettings> {
        let assets = &config.assets;
        std::fs::create_dir_all(&assets.upload_dir).map_err(|source| {
            ApiServerError::UploadDir {
                path: assets.upload_dir.clone(),
                source,
            }
        })?;
        Ok(UploadSettings {
            dir: assets.upload_dir.clone(),
            url_prefix: public_url_prefix(&assets.static_root, &assets.upload_dir),
            max_file_bytes: u64::try_from(config.server.body_limit_bytes).unwrap_or(u64::MAX),
        })
    }

    fn build_router(state: &Arc<ApiState>, static_root: &Path) -> Router<Arc<ApiState>> {
        Self::public_routes()
            .merge(Self::api_routes(state))
            .merge(swagger_ui())
            .nest_service(PUBLIC_MOUNT, ServeDir::new(static_root))
    }

    fn public_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/", get(welcome))
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route(OPENAPI_JSON_PATH, get(openapi_document_handler))
    }

    fn api_routes(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        let auth_guard = middleware::from_fn_with_state(state.clone(), require_authenticated);
        let admin_guard = middleware::from_fn_with_state(state.clone(), require_admin);
        let super_admin_guard = middleware::from_fn_with_state(state.clone(), require_super_admin);

        Router::new()
            .route("/api/auth/me", get(me).route_layer(auth_guard.clone()))
            .route(
                "/api/auth/admin",
                get(admin_role).route_layer(admin_guard.clone()),
            )
            .route(
                "/api/auth/super-admin",
                get(super_admin_role).route_layer(super_admin_guard),
            )
            .route("/api/email", post(send_email).route_layer(admin_guard))
            .route("/api/uploads", post(upload_files).route_layer(auth_guard))
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(%addr, "api listening");
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }

    /// The fully layered router, for in-process requests.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Public URL prefix for files stored under `upload_dir`.
fn public_url_prefix(static_root: &Path, upload_dir: &Path) -> String {
    let relative = upload_dir.strip_prefix(static_root).unwrap_or(upload_dir);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .fold(PUBLIC_MOUNT.to_string(), |mut prefix, part| {
            prefix.push('/');
            prefix.push_str(part);
            prefix
        })
}
