//! Documentation endpoints.

use std::sync::Arc;

use axum::{Json, Router, extract::State};
use serde_json::Value;
use utoipa_swagger_ui::{Config, SwaggerUi};

use crate::http::constants::{DOCS_PATH, OPENAPI_JSON_PATH};
use crate::state::ApiState;

pub(crate) async fn openapi_document_handler(State(state): State<Arc<ApiState>>) -> Json<Value> {
    Json((*state.openapi_document).clone())
}

/// Swagger UI assets pointed at the document served by [`openapi_document_handler`].
pub(crate) fn swagger_ui() -> Router<Arc<ApiState>> {
    SwaggerUi::new(DOCS_PATH)
        .config(Config::from(OPENAPI_JSON_PATH))
        .into()
}
