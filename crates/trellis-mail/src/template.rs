//! Strict-mode Handlebars templates.

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{MailError, MailResult};

/// Name of the transactional email template (`email.hbs`).
pub const EMAIL_TEMPLATE: &str = "email";

/// Variables exposed to the email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailContext {
    /// Recipient address.
    pub email: String,
    /// Recipient given name.
    pub first_name: String,
    /// Recipient family name.
    pub last_name: String,
    /// Frontend login link; empty when not configured.
    pub action_url: String,
}

/// Compiled template registry.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Compile `{dir}/email.hbs`.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Template`] if the file is missing or does not compile.
    pub fn from_dir(dir: &Path) -> MailResult<Self> {
        let path = dir.join(format!("{EMAIL_TEMPLATE}.hbs"));
        let mut registry = strict_registry();
        registry
            .register_template_file(EMAIL_TEMPLATE, &path)
            .map_err(|source| MailError::Template {
                path: path.clone(),
                source: Box::new(source),
            })?;
        tracing::debug!(path = %path.display(), "email template compiled");
        Ok(Self { registry })
    }

    /// Compile the email template from an in-memory source.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Template`] if the source does not compile.
    pub fn from_source(source: &str) -> MailResult<Self> {
        let mut registry = strict_registry();
        registry
            .register_template_string(EMAIL_TEMPLATE, source)
            .map_err(|source| MailError::Template {
                path: format!("<inline:{EMAIL_TEMPLATE}>").into(),
                source: Box::new(source),
            })?;
        Ok(Self { registry })
    }

    /// Render the email template.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Render`] when rendering fails, including variables
    /// the context does not provide.
    pub fn render(&self, context: &EmailContext) -> MailResult<String> {
        self.registry
            .render(EMAIL_TEMPLATE, context)
            .map_err(|source| MailError::Render {
                template: EMAIL_TEMPLATE,
                source: Box::new(source),
            })
    }
}

fn strict_registry() -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
}
