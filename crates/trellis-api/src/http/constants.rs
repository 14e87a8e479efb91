//! Shared HTTP constants (headers, guard messages, mount points).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const BEARER_SCHEME: &str = "Bearer";

pub(crate) const MSG_LOGIN_REQUIRED: &str = "You should be logged in to access this resource";
pub(crate) const MSG_INVALID_TOKEN: &str = "Invalid token";
pub(crate) const MSG_NOT_AUTHORIZED: &str = "You are not authorized to access this resource";
pub(crate) const MSG_INVALID_TOKEN_OR_ROLE: &str = "Invalid token or role";
pub(crate) const MSG_INTERNAL: &str = "Internal server error";
pub(crate) const MSG_EMAIL_SENT: &str = "Email sent";
pub(crate) const MSG_MAIL_DISABLED: &str = "Email delivery is not configured";
pub(crate) const MSG_INVALID_RECIPIENT: &str = "email must be a valid email address";
pub(crate) const MSG_NO_FILES: &str = "No files uploaded";
pub(crate) const MSG_FILE_TOO_LARGE: &str = "File too large";

pub(crate) const PUBLIC_MOUNT: &str = "/public";
pub(crate) const DOCS_PATH: &str = "/api/docs";
pub(crate) const OPENAPI_JSON_PATH: &str = "/api/docs/openapi.json";
pub(crate) const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";
