//! Authentication and authorization middleware for the HTTP layer.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use trellis_identity::{IdentityUser, Role};

use crate::http::constants::{
    BEARER_SCHEME, MSG_INVALID_TOKEN, MSG_INVALID_TOKEN_OR_ROLE, MSG_LOGIN_REQUIRED,
    MSG_NOT_AUTHORIZED,
};
use crate::http::errors::ApiError;
use crate::state::ApiState;

/// User record attached to the request by the authentication guard.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub IdentityUser);

const AUTH_GUARD: &str = "auth";

#[derive(Debug, Clone, Copy)]
enum RoleGuard {
    Admin,
    SuperAdmin,
}

impl RoleGuard {
    const fn label(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    const fn required(self) -> Role {
        match self {
            Self::Admin => Role::Admin,
            Self::SuperAdmin => Role::SuperAdmin,
        }
    }
}

/// Token carried by `Authorization: Bearer <token>`.
///
/// The header is split on single spaces; anything other than the exact
/// `Bearer` scheme followed by a non-empty second part yields `None`.
#[must_use]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split(' ');
    match (parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token)) if !token.is_empty() => Some(token),
        _ => None,
    }
}

pub(crate) async fn require_authenticated(
    State(state): State<Arc<ApiState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_bearer_token(req.headers()).map(str::to_owned) else {
        state.metrics.inc_auth_failure(AUTH_GUARD, "missing_token");
        warn!(guard = AUTH_GUARD, "request without bearer token");
        return Err(ApiError::unauthorized(MSG_LOGIN_REQUIRED));
    };

    let user = state.auth.authenticate(&token).await.map_err(|err| {
        state.metrics.inc_auth_failure(AUTH_GUARD, err.reason());
        warn!(guard = AUTH_GUARD, error = %err, "authentication failed");
        ApiError::unauthorized(MSG_INVALID_TOKEN)
    })?;

    req.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(req).await)
}

pub(crate) async fn require_admin(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(&state, RoleGuard::Admin, req, next).await
}

pub(crate) async fn require_super_admin(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(&state, RoleGuard::SuperAdmin, req, next).await
}

async fn require_role(
    state: &ApiState,
    guard: RoleGuard,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_bearer_token(req.headers()).map(str::to_owned) else {
        state.metrics.inc_auth_failure(guard.label(), "missing_token");
        warn!(guard = guard.label(), "request without bearer token");
        return Err(ApiError::unauthorized(MSG_NOT_AUTHORIZED));
    };

    let role = state.auth.resolve_role(&token).await.map_err(|err| {
        state.metrics.inc_auth_failure(guard.label(), err.reason());
        warn!(guard = guard.label(), error = %err, "role resolution failed");
        ApiError::unauthorized(MSG_INVALID_TOKEN_OR_ROLE)
    })?;

    if !role.satisfies(guard.required()) {
        state
            .metrics
            .inc_auth_failure(guard.label(), "insufficient_role");
        warn!(
            guard = guard.label(),
            role = role.as_str(),
            "role does not grant access"
        );
        return Err(ApiError::forbidden(MSG_NOT_AUTHORIZED));
    }

    req.extensions_mut().insert(role);
    Ok(next.run(req).await)
}
