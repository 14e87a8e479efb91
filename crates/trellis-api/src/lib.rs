#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]
//! HTTP surface for Trellis: routing, guards, handlers and error mapping.
//!
//! # Design
//! - [`ApiServer`] owns the fully layered axum router; the binary only picks
//!   an address and a shutdown signal.
//! - Identity lookups and mail delivery arrive as trait objects through
//!   [`ApiDependencies`] so tests can substitute them.
//! - Every failure leaves the process as `{"statusCode", "message"}`.

pub mod error;
pub mod http;
pub mod openapi;
pub mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::auth::{AuthenticatedUser, extract_bearer_token};
pub use http::router::ApiServer;
pub use openapi::{ApiDoc, openapi_document};
pub use state::{ApiDependencies, ApiState};
