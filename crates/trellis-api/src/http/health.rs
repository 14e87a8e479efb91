//! Welcome, liveness and metrics endpoints.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use tracing::error;
use trellis_api_models::{HealthResponse, WelcomeResponse};

use crate::http::constants::PROMETHEUS_CONTENT_TYPE;
use crate::http::errors::ApiError;
use crate::state::ApiState;

#[utoipa::path(
    get,
    path = "/",
    tag = "app",
    responses((status = 200, description = "Greeting", body = WelcomeResponse))
)]
pub(crate) async fn welcome(State(state): State<Arc<ApiState>>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: format!("Welcome to {} API", state.app_name),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "app",
    responses((status = 200, description = "Process is serving requests", body = HealthResponse))
)]
pub(crate) async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "app",
    responses((status = 200, description = "Prometheus exposition", body = String, content_type = "text/plain"))
)]
pub(crate) async fn metrics(State(state): State<Arc<ApiState>>) -> Result<Response, ApiError> {
    match state.metrics.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)
            .body(Body::from(body))
            .map_err(|err| {
                error!(error = %err, "failed to build metrics response");
                ApiError::internal()
            }),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            Err(ApiError::internal())
        }
    }
}
