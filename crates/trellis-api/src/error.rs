//! # Design
//!
//! - One error type for building and serving the API.
//! - Messages stay constant; the failing path or address lives in fields.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

use trellis_telemetry::TelemetryError;

/// Result alias for API server operations.
pub type ApiServerResult<T> = std::result::Result<T, ApiServerError>;

/// Errors raised while bootstrapping or serving the API.
#[derive(Debug)]
pub enum ApiServerError {
    /// The `OpenAPI` document could not be converted to JSON.
    OpenApiRender {
        /// Underlying serialization error.
        source: serde_json::Error,
    },
    /// Persisting the `OpenAPI` artifact failed.
    OpenApiPersist {
        /// Target path for the artifact.
        path: PathBuf,
        /// Underlying telemetry error.
        source: TelemetryError,
    },
    /// The upload directory could not be created.
    UploadDir {
        /// Directory attempted.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Binding the API listener failed.
    Bind {
        /// Address attempted.
        addr: SocketAddr,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Serving the API failed.
    Serve {
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl Display for ApiServerError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenApiRender { .. } => formatter.write_str("failed to render openapi"),
            Self::OpenApiPersist { .. } => formatter.write_str("failed to persist openapi"),
            Self::UploadDir { .. } => formatter.write_str("failed to prepare upload directory"),
            Self::Bind { .. } => formatter.write_str("failed to bind api listener"),
            Self::Serve { .. } => formatter.write_str("api server terminated unexpectedly"),
        }
    }
}

impl Error for ApiServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OpenApiRender { source } => Some(source),
            Self::OpenApiPersist { source, .. } => Some(source),
            Self::UploadDir { source, .. } | Self::Bind { source, .. } | Self::Serve { source } => {
                Some(source)
            }
        }
    }
}
