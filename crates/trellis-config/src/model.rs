//! Typed configuration sections.
//!
//! # Design
//! - Pure data carriers built once at boot and shared read-only afterwards.
//! - Secrets stay wrapped in [`SecretString`] so they never reach logs via `Debug`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use url::Url;

use crate::error::ConfigError;

/// Fully resolved service configuration.
#[derive(Debug)]
pub struct AppConfig {
    /// Display name used in the welcome message.
    pub app_name: String,
    /// Deployment environment.
    pub environment: Environment,
    /// Listener settings.
    pub server: ServerConfig,
    /// Cross-origin policy.
    pub cors: CorsConfig,
    /// Security header toggles.
    pub security: SecurityConfig,
    /// Identity provider credentials.
    pub identity: IdentityConfig,
    /// SMTP settings; `None` disables email.
    pub mail: Option<MailConfig>,
    /// Static asset and upload locations.
    pub assets: AssetsConfig,
    /// Logging preferences.
    pub logging: LoggingSettings,
    /// Where to persist the generated `OpenAPI` document, if anywhere.
    pub openapi_path: Option<PathBuf>,
}

/// Deployment environment recorded in `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Automated test runs.
    Test,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Render the environment as its lowercase string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    /// Whether this is a production deployment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidVar {
                name: "APP_ENV",
                reason: "unknown_environment",
                value: Some(value.to_string()),
            }),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: IpAddr,
    /// TCP port to bind.
    pub port: u16,
    /// Maximum request body size in bytes.
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    /// Socket address the listener binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// Cross-origin resource sharing policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsConfig {
    /// Origins allowed to make credentialed cross-origin requests.
    pub allowed_origins: Vec<String>,
}

/// Security header toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Emit a `Content-Security-Policy` header.
    pub enable_csp: bool,
    /// Emit a `Strict-Transport-Security` header.
    pub enable_hsts: bool,
}

/// Identity provider credentials and endpoints.
#[derive(Debug)]
pub struct IdentityConfig {
    /// Backend API secret key.
    pub secret_key: SecretString,
    /// PEM-encoded public key used to verify session tokens.
    pub jwt_public_key: String,
    /// Expected token audience (the public URL of this API).
    pub audience: String,
    /// Base URL of the provider's backend API.
    pub api_base_url: Url,
}

/// SMTP transport and template settings.
#[derive(Debug)]
pub struct MailConfig {
    /// SMTP relay host.
    pub host: String,
    /// SMTP relay port.
    pub port: u16,
    /// Optional SMTP username.
    pub username: Option<String>,
    /// Optional SMTP password.
    pub password: Option<SecretString>,
    /// Sender mailbox (`Name <addr>` or bare address).
    pub sender: String,
    /// Subject line for the templated email.
    pub subject: String,
    /// Directory containing the Handlebars templates.
    pub template_dir: PathBuf,
    /// Frontend login URL passed to templates as `actionUrl`.
    pub login_url: Option<String>,
}

/// Static asset and upload locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetsConfig {
    /// Directory served under `/public/`.
    pub static_root: PathBuf,
    /// Directory receiving uploaded files.
    pub upload_dir: PathBuf,
}

/// Logging preferences read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default level filter when `RUST_LOG` is not set.
    pub level: String,
    /// Requested output format (`json` or `pretty`), if any.
    pub format: Option<String>,
}
