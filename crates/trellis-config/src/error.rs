//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set (or was blank).
    #[error("missing environment variable")]
    MissingVar {
        /// Name of the missing variable.
        name: &'static str,
    },
    /// An environment variable held a value that failed validation.
    #[error("invalid environment variable")]
    InvalidVar {
        /// Name of the offending variable.
        name: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value, omitted for secrets.
        value: Option<String>,
    },
    /// The dotenv file existed but could not be parsed.
    #[error("failed to load dotenv file")]
    Dotenv {
        /// Path of the dotenv file.
        path: PathBuf,
        /// Source dotenv error.
        source: dotenvy::Error,
    },
}

impl ConfigError {
    /// Name of the environment variable tied to the failure, when there is one.
    #[must_use]
    pub const fn var_name(&self) -> Option<&'static str> {
        match self {
            Self::MissingVar { name } | Self::InvalidVar { name, .. } => Some(name),
            Self::Dotenv { .. } => None,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
