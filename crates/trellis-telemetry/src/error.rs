//! Error types for telemetry operations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use prometheus::Error as PrometheusError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised by telemetry helpers.
#[derive(Debug)]
pub enum TelemetryError {
    /// Installing the global tracing subscriber failed.
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        source: tracing_subscriber::util::TryInitError,
    },
    /// A log format name was not recognised.
    UnknownLogFormat {
        /// Rejected format name.
        value: String,
    },
    /// Building or registering a Prometheus collector failed.
    MetricsRegister {
        /// Metric identifier tied to the failure.
        name: &'static str,
        /// Underlying Prometheus error.
        source: PrometheusError,
    },
    /// Encoding the Prometheus registry failed.
    MetricsEncode {
        /// Underlying Prometheus error.
        source: PrometheusError,
    },
    /// Rendered metrics output was not valid UTF-8.
    MetricsUtf8 {
        /// Underlying UTF-8 conversion error.
        source: std::string::FromUtf8Error,
    },
    /// Serialising the `OpenAPI` document failed.
    OpenApiSerialize {
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// Creating the `OpenAPI` output directory failed.
    OpenApiCreateDir {
        /// Directory path that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Writing the `OpenAPI` artifact failed.
    OpenApiWrite {
        /// File path that could not be written.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::SubscriberInstall { .. } => "failed to install tracing subscriber",
            Self::UnknownLogFormat { .. } => "unknown log format",
            Self::MetricsRegister { .. } => "failed to register metrics collector",
            Self::MetricsEncode { .. } => "failed to encode metrics",
            Self::MetricsUtf8 { .. } => "metrics output was not valid utf-8",
            Self::OpenApiSerialize { .. } => "failed to serialize openapi document",
            Self::OpenApiCreateDir { .. } => "failed to create openapi output directory",
            Self::OpenApiWrite { .. } => "failed to write openapi artifact",
        };
        formatter.write_str(message)
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SubscriberInstall { source } => Some(source),
            Self::UnknownLogFormat { .. } => None,
            Self::MetricsRegister { source, .. } | Self::MetricsEncode { source } => Some(source),
            Self::MetricsUtf8 { source } => Some(source),
            Self::OpenApiSerialize { source } => Some(source),
            Self::OpenApiCreateDir { source, .. } | Self::OpenApiWrite { source, .. } => {
                Some(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn messages_are_constant_and_context_stays_in_fields() {
        let err = TelemetryError::UnknownLogFormat {
            value: "yaml".to_string(),
        };
        assert_eq!(err.to_string(), "unknown log format");
        assert!(err.source().is_none());

        let err = TelemetryError::OpenApiWrite {
            path: PathBuf::from("docs/openapi.json"),
            source: io::Error::other("disk full"),
        };
        assert_eq!(err.to_string(), "failed to write openapi artifact");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("disk full")
        );
    }

    #[test]
    fn metrics_errors_expose_prometheus_source() {
        let err = TelemetryError::MetricsRegister {
            name: "uploads_total",
            source: PrometheusError::AlreadyReg,
        };
        assert_eq!(err.to_string(), "failed to register metrics collector");
        assert!(err.source().is_some());

        let utf8 = String::from_utf8(vec![0, 159]).err();
        if let Some(source) = utf8 {
            let err = TelemetryError::MetricsUtf8 { source };
            assert_eq!(err.to_string(), "metrics output was not valid utf-8");
            assert!(err.source().is_some());
        }
    }
}
