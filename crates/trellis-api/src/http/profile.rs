//! Endpoints that report who the caller is.

use axum::{Extension, Json};
use trellis_api_models::{ErrorBody, RoleResponse, UserProfile};
use trellis_identity::ResolvedRole;

use crate::http::auth::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Signed-in user", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub(crate) async fn me(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Json<UserProfile> {
    let email = user.primary_email().map(str::to_owned);
    let role = user.role_claim().map(str::to_owned);
    Json(UserProfile {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email,
        image_url: user.image_url,
        role,
        created_at: user.created_at,
        updated_at: user.updated_at,
    })
}

#[utoipa::path(
    get,
    path = "/api/auth/admin",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller holds admin or super-admin", body = RoleResponse),
        (status = 401, description = "Missing token or unresolvable role", body = ErrorBody),
        (status = 403, description = "Role too low", body = ErrorBody)
    )
)]
pub(crate) async fn admin_role(Extension(role): Extension<ResolvedRole>) -> Json<RoleResponse> {
    role_response(&role)
}

#[utoipa::path(
    get,
    path = "/api/auth/super-admin",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller holds super-admin", body = RoleResponse),
        (status = 401, description = "Missing token or unresolvable role", body = ErrorBody),
        (status = 403, description = "Role too low", body = ErrorBody)
    )
)]
pub(crate) async fn super_admin_role(
    Extension(role): Extension<ResolvedRole>,
) -> Json<RoleResponse> {
    role_response(&role)
}

fn role_response(role: &ResolvedRole) -> Json<RoleResponse> {
    Json(RoleResponse {
        role: role.as_str().to_string(),
    })
}
