#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Trellis application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (service wiring and shutdown), `error.rs` (boot errors).

/// Application bootstrap and environment loading.
pub mod bootstrap;
/// Boot-time error type.
pub mod error;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
