//! `POST /api/email`.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{error, info};
use trellis_api_models::{ErrorBody, MessageResponse, SendEmailRequest};

use crate::http::constants::{MSG_EMAIL_SENT, MSG_INVALID_RECIPIENT, MSG_MAIL_DISABLED};
use crate::http::errors::ApiError;
use crate::state::ApiState;

#[utoipa::path(
    post,
    path = "/api/email",
    tag = "email",
    security(("bearer" = [])),
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email handed to the relay", body = MessageResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 401, description = "Missing token or unresolvable role", body = ErrorBody),
        (status = 403, description = "Role too low", body = ErrorBody),
        (status = 503, description = "Mail is not configured", body = ErrorBody)
    )
)]
pub(crate) async fn send_email(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    request
        .validate()
        .map_err(|field| ApiError::bad_request(format!("{field} should not be empty")))?;

    let mail = state
        .mail
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable(MSG_MAIL_DISABLED))?;

    match mail
        .send_email(&request.email, &request.first_name, &request.last_name)
        .await
    {
        Ok(()) => {
            state.metrics.inc_email("sent");
            info!("email sent");
            Ok(Json(MessageResponse::new(MSG_EMAIL_SENT)))
        }
        Err(err) if err.is_invalid_input() => Err(ApiError::bad_request(MSG_INVALID_RECIPIENT)),
        Err(err) => {
            state.metrics.inc_email("failed");
            error!(error = %err, "email send failed");
            Err(ApiError::internal())
        }
    }
}
