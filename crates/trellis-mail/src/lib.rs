#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Transactional email: Handlebars rendering and SMTP delivery.
//!
//! Layout: `template.rs` (strict-mode template registry), `transport.rs`
//! (the [`MailTransport`] seam and its SMTP implementation), `service.rs`
//! (the send flow used by the API), `error.rs`.

pub mod error;
pub mod service;
pub mod template;
pub mod transport;

pub use error::{MailError, MailResult};
pub use service::MailService;
pub use template::{EMAIL_TEMPLATE, EmailContext, TemplateRenderer};
pub use transport::{MailTransport, RenderedMail, SmtpMailTransport};
