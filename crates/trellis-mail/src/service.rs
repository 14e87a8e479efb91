//! Transactional email flow.

use std::sync::Arc;

use lettre::Address;
use tracing::{info, warn};

use trellis_config::MailConfig;

use crate::error::{MailError, MailResult};
use crate::template::{EmailContext, TemplateRenderer};
use crate::transport::{MailTransport, RenderedMail, SmtpMailTransport};

/// Renders the email template and hands the result to a transport.
#[derive(Clone)]
pub struct MailService {
    renderer: Arc<TemplateRenderer>,
    transport: Arc<dyn MailTransport>,
    subject: String,
    login_url: Option<String>,
}

impl MailService {
    /// Assemble a service from parts.
    #[must_use]
    pub fn new(
        renderer: TemplateRenderer,
        transport: Arc<dyn MailTransport>,
        subject: impl Into<String>,
        login_url: Option<String>,
    ) -> Self {
        Self {
            renderer: Arc::new(renderer),
            transport,
            subject: subject.into(),
            login_url,
        }
    }

    /// Compile templates from `template_dir` and connect to the SMTP relay.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be loaded or the transport cannot be configured.
    pub fn from_config(config: &MailConfig) -> MailResult<Self> {
        let renderer = TemplateRenderer::from_dir(&config.template_dir)?;
        let transport = SmtpMailTransport::from_config(config)?;
        info!(host = %config.host, port = config.port, "smtp transport configured");
        Ok(Self::new(
            renderer,
            Arc::new(transport),
            config.subject.clone(),
            config.login_url.clone(),
        ))
    }

    /// Send the templated email to `email`, greeting the recipient by name.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::InvalidAddress`] for a malformed recipient, or any
    /// rendering or delivery failure.
    pub async fn send_email(&self, email: &str, first_name: &str, last_name: &str) -> MailResult<()> {
        let recipient = email.trim();
        recipient
            .parse::<Address>()
            .map_err(|source| MailError::InvalidAddress {
                field: "recipient",
                source,
            })?;

        let context = EmailContext {
            email: recipient.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            action_url: self.login_url.clone().unwrap_or_default(),
        };
        let html = self.renderer.render(&context)?;

        let mail = RenderedMail {
            to: recipient.to_string(),
            subject: self.subject.clone(),
            html,
        };
        self.transport.deliver(mail).await.inspect_err(|err| {
            warn!(error = %err, "email delivery failed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<RenderedMail>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn deliver(&self, mail: RenderedMail) -> MailResult<()> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(mail);
            }
            Ok(())
        }
    }

    fn service(transport: Arc<RecordingTransport>) -> MailResult<MailService> {
        Ok(MailService::new(
            TemplateRenderer::from_source("{{firstName}}|{{lastName}}|{{email}}|{{actionUrl}}")?,
            transport,
            "Welcome aboard",
            None,
        ))
    }

    #[tokio::test]
    async fn renders_and_delivers_with_configured_subject() -> anyhow::Result<()> {
        let transport = Arc::new(RecordingTransport::default());
        service(Arc::clone(&transport))?
            .send_email(" ada@example.com ", "Ada", "Lovelace")
            .await?;

        let sent = transport.sent.lock().map_err(|_| anyhow::anyhow!("poisoned"))?;
        assert_eq!(
            sent.as_slice(),
            [RenderedMail {
                to: "ada@example.com".into(),
                subject: "Welcome aboard".into(),
                html: "Ada|Lovelace|ada@example.com|".into(),
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn malformed_recipient_is_rejected_before_delivery() -> anyhow::Result<()> {
        let transport = Arc::new(RecordingTransport::default());
        let err = service(Arc::clone(&transport))?
            .send_email("not-an-email", "Ada", "Lovelace")
            .await
            .err();
        assert!(err.as_ref().is_some_and(MailError::is_invalid_input));
        assert!(transport.sent.lock().map_err(|_| anyhow::anyhow!("poisoned"))?.is_empty());
        Ok(())
    }
}
