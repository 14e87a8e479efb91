//! Global error mapping to `{"statusCode", "message"}` bodies.

use std::any::Any;

use axum::{
    Json,
    extract::{
        Request,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::{
        Method, StatusCode, Uri,
        header::{ALLOW, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::error;
use trellis_api_models::ErrorBody;
use trellis_telemetry::current_request_id;

use crate::http::constants::MSG_INTERNAL;

/// Error returned from handlers and guards.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    message: String,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    pub(crate) fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    #[cfg(test)]
    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status_code: self.status.as_u16(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Payloads that parse badly or miss fields are client input errors.
        let status = if matches!(
            rejection,
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_)
        ) {
            StatusCode::BAD_REQUEST
        } else {
            rejection.status()
        };
        Self::new(status, rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        error!(
            error = %err,
            request_id = current_request_id().unwrap_or_default(),
            "unhandled io error"
        );
        Self::internal()
    }
}

/// Router fallback for unknown paths.
pub(crate) async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        format!("Cannot {method} {}", uri.path()),
    )
}

/// Give bodiless 404/405 responses produced by axum or `ServeDir` the JSON shape.
pub(crate) async fn normalize_bare_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;

    let status = response.status();
    let bare = matches!(status, StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED)
        && !response.headers().contains_key(CONTENT_TYPE);
    if !bare {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut rendered = ApiError::new(status, format!("Cannot {method} {path}")).into_response();
    if let Some(allow) = allow {
        rendered.headers_mut().insert(ALLOW, allow);
    }
    rendered
}

/// Response for a panicking handler; the payload is logged, never returned.
pub(crate) fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(
        panic = detail,
        request_id = current_request_id().unwrap_or_default(),
        "handler panicked"
    );
    ApiError::internal().into_response()
}
