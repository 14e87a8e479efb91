//! Fallback values applied when optional variables are absent.

/// Display name used in the welcome message.
pub const APP_NAME: &str = "App Name";
/// Interface the HTTP listener binds to.
pub const BIND_ADDR: &str = "0.0.0.0";
/// TCP port the HTTP listener binds to.
pub const PORT: u16 = 3001;
/// Maximum accepted request body (and upload part) size in bytes.
pub const BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;
/// Base URL of the identity provider's backend API.
pub const IDENTITY_API_URL: &str = "https://api.clerk.com/v1";
/// SMTP submission port (STARTTLS upgraded when offered).
pub const EMAIL_PORT: u16 = 587;
/// Subject line for the templated email.
pub const EMAIL_SUBJECT: &str = "Your email subject";
/// Directory holding Handlebars email templates.
pub const EMAIL_TEMPLATE_DIR: &str = "email-templates";
/// Directory served under `/public/`.
pub const STATIC_ROOT: &str = "public";
/// Directory receiving uploaded files.
pub const UPLOAD_DIR: &str = "public/uploads";
/// Log level used when neither `RUST_LOG` nor `LOG_LEVEL` is set.
pub const LOG_LEVEL: &str = "info";
