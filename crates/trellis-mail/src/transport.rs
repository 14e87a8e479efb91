//! Delivery seam and the SMTP implementation.
//!
//! # Design
//! - The service hands over a fully rendered message; transports only deliver.
//! - SMTP upgrades to TLS when the relay offers STARTTLS and continues in
//!   plaintext otherwise.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use tracing::info;

use trellis_config::MailConfig;

use crate::error::{MailError, MailResult};

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Delivers rendered messages.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send one message.
    async fn deliver(&self, mail: RenderedMail) -> MailResult<()>;
}

/// SMTP relay transport.
pub struct SmtpMailTransport {
    relay: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailTransport {
    /// Configure the relay from mail settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender mailbox is invalid or TLS parameters
    /// cannot be built for the host.
    pub fn from_config(config: &MailConfig) -> MailResult<Self> {
        let sender = config
            .sender
            .parse::<Mailbox>()
            .map_err(|source| MailError::InvalidAddress {
                field: "sender",
                source,
            })?;
        let tls = TlsParameters::new(config.host.clone())
            .map_err(|source| MailError::Transport { source })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(Tls::Opportunistic(tls));
        if let Some(username) = &config.username {
            let password = config
                .password
                .as_ref()
                .map(|secret| secret.expose_secret().to_owned())
                .unwrap_or_default();
            builder = builder.credentials(Credentials::new(username.clone(), password));
        }

        Ok(Self {
            relay: builder.build(),
            sender,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, mail: RenderedMail) -> MailResult<()> {
        let recipient = mail
            .to
            .parse::<Mailbox>()
            .map_err(|source| MailError::InvalidAddress {
                field: "recipient",
                source,
            })?;
        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)
            .map_err(|source| MailError::Build { source })?;

        let response = self
            .relay
            .send(message)
            .await
            .map_err(|source| MailError::Transport { source })?;
        info!(code = %response.code(), "smtp relay accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(sender: &str) -> MailConfig {
        MailConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: Some("mailer".into()),
            password: None,
            sender: sender.into(),
            subject: "Subject".into(),
            template_dir: PathBuf::from("email-templates"),
            login_url: None,
        }
    }

    #[test]
    fn rejects_malformed_sender() {
        let result = SmtpMailTransport::from_config(&config("not an address"));
        assert!(matches!(
            result,
            Err(MailError::InvalidAddress { field: "sender", .. })
        ));
    }
}
