//! Error types for email rendering and delivery.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while preparing or sending an email.
#[derive(Debug, Error)]
pub enum MailError {
    /// A mailbox or address failed to parse.
    #[error("invalid email address")]
    InvalidAddress {
        /// Which address was rejected (`recipient` or `sender`).
        field: &'static str,
        /// Underlying lettre error.
        #[source]
        source: lettre::address::AddressError,
    },
    /// A template file could not be read or compiled.
    #[error("failed to load email template")]
    Template {
        /// Template path.
        path: PathBuf,
        /// Underlying handlebars error.
        #[source]
        source: Box<handlebars::TemplateError>,
    },
    /// Rendering failed, typically a missing variable under strict mode.
    #[error("failed to render email template")]
    Render {
        /// Template name.
        template: &'static str,
        /// Underlying handlebars error.
        #[source]
        source: Box<handlebars::RenderError>,
    },
    /// The MIME message could not be assembled.
    #[error("failed to build email message")]
    Build {
        /// Underlying lettre error.
        #[source]
        source: lettre::error::Error,
    },
    /// The SMTP exchange failed or the transport could not be configured.
    #[error("smtp transport failed")]
    Transport {
        /// Underlying SMTP error.
        #[source]
        source: lettre::transport::smtp::Error,
    },
}

impl MailError {
    /// Whether the failure stems from caller input rather than the mail backend.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress {
                field: "recipient",
                ..
            }
        )
    }
}

/// Convenience alias for mail results.
pub type MailResult<T> = Result<T, MailError>;
