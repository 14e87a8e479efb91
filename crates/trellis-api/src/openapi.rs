//! Generated `OpenAPI` document.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use trellis_api_models::{
    ErrorBody, HealthResponse, MessageResponse, RoleResponse, SendEmailRequest, UploadResponse,
    UploadedFile, UserProfile, WelcomeResponse,
};

/// Name of the bearer security scheme referenced by guarded operations.
pub const BEARER_SCHEME_NAME: &str = "bearer";

/// Multipart body accepted by `POST /api/uploads`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub(crate) struct UploadForm {
    /// One or more file parts; any field name is accepted.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// `OpenAPI` description of every route.
#[derive(OpenApi)]
#[openapi(
    info(title = "Trellis API", description = "HTTP API starter service"),
    paths(
        crate::http::health::welcome,
        crate::http::health::health,
        crate::http::health::metrics,
        crate::http::profile::me,
        crate::http::profile::admin_role,
        crate::http::profile::super_admin_role,
        crate::http::mail::send_email,
        crate::http::uploads::upload_files,
    ),
    components(schemas(
        ErrorBody,
        WelcomeResponse,
        HealthResponse,
        MessageResponse,
        UserProfile,
        RoleResponse,
        SendEmailRequest,
        UploadedFile,
        UploadResponse,
        UploadForm,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "app", description = "Service information"),
        (name = "auth", description = "Caller identity and role checks"),
        (name = "email", description = "Transactional email"),
        (name = "uploads", description = "File uploads")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                BEARER_SCHEME_NAME,
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Build the document served at `/api/docs/openapi.json`.
#[must_use]
pub fn openapi_document() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
