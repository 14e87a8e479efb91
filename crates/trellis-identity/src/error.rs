//! Error types for identity operations.

use thiserror::Error;

/// Failures raised while authenticating a request against the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No bearer token accompanied the request.
    #[error("missing bearer token")]
    MissingToken,
    /// The configured verification key could not be parsed.
    #[error("invalid token verification key")]
    InvalidKey {
        /// Underlying key parsing error.
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    /// The provider base URL cannot carry path segments.
    #[error("invalid identity provider base url")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
    },
    /// Building the HTTP client failed.
    #[error("failed to build identity http client")]
    ClientBuild {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// Signature, audience or timing checks failed.
    #[error("token verification failed")]
    InvalidToken {
        /// Underlying verification error.
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    /// The token subject does not exist at the provider.
    #[error("user not found")]
    UserNotFound {
        /// Subject that was looked up.
        user_id: String,
    },
    /// The provider answered with a non-success status.
    #[error("identity provider returned an error status")]
    UpstreamStatus {
        /// HTTP status returned by the provider.
        status: u16,
    },
    /// The request to the provider failed or its body could not be decoded.
    #[error("identity provider request failed")]
    Transport {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The user record carries no role in its public metadata.
    #[error("user role not found")]
    RoleMissing {
        /// User without a role.
        user_id: String,
    },
}

impl IdentityError {
    /// Short label for metrics and logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidKey { .. } | Self::InvalidBaseUrl { .. } | Self::ClientBuild { .. } => {
                "misconfigured"
            }
            Self::InvalidToken { .. } => "invalid_token",
            Self::UserNotFound { .. } => "user_not_found",
            Self::UpstreamStatus { .. } | Self::Transport { .. } => "upstream",
            Self::RoleMissing { .. } => "role_missing",
        }
    }
}

/// Convenience alias for identity results.
pub type IdentityResult<T> = Result<T, IdentityError>;
