//! # Design
//!
//! - Centralize boot-time errors raised while wiring the service together.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading or validation failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: trellis_config::ConfigError,
    },
    /// Telemetry setup failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: trellis_telemetry::TelemetryError,
    },
    /// The identity client could not be constructed.
    #[error("identity operation failed")]
    Identity {
        /// Operation identifier.
        operation: &'static str,
        /// Source identity error.
        source: trellis_identity::IdentityError,
    },
    /// Mail delivery could not be configured.
    #[error("mail operation failed")]
    Mail {
        /// Operation identifier.
        operation: &'static str,
        /// Source mail error.
        source: trellis_mail::MailError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: trellis_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: trellis_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: trellis_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn identity(
        operation: &'static str,
        source: trellis_identity::IdentityError,
    ) -> Self {
        Self::Identity { operation, source }
    }

    pub(crate) const fn mail(operation: &'static str, source: trellis_mail::MailError) -> Self {
        Self::Mail { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: trellis_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }

    /// Identifier of the boot step that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Config { operation, .. }
            | Self::Telemetry { operation, .. }
            | Self::Identity { operation, .. }
            | Self::Mail { operation, .. }
            | Self::ApiServer { operation, .. } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.from_env",
            trellis_config::ConfigError::MissingVar { name: "API_URL" },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert_eq!(config.operation(), "config.from_env");
        assert_eq!(config.to_string(), "configuration operation failed");
        assert!(config.source().is_some());

        let telemetry = AppError::telemetry(
            "telemetry.init",
            trellis_telemetry::TelemetryError::UnknownLogFormat {
                value: "xml".into(),
            },
        );
        assert!(matches!(telemetry, AppError::Telemetry { .. }));

        let identity = AppError::identity(
            "identity.client",
            trellis_identity::IdentityError::MissingToken,
        );
        assert_eq!(identity.operation(), "identity.client");

        let api = AppError::api_server(
            "api_server.serve",
            trellis_api::ApiServerError::Serve {
                source: io::Error::other("io"),
            },
        );
        assert!(matches!(api, AppError::ApiServer { .. }));
        assert_eq!(api.to_string(), "api server operation failed");
    }
}
