#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Environment-driven configuration for the Trellis service.
//!
//! Layout: `model.rs` (typed config sections), `validate.rs` (value
//! parsing helpers), `loader.rs` (environment and `.env` loading),
//! `defaults.rs` (fallback values).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_dotenv, load_dotenv_from};
pub use model::{
    AppConfig, AssetsConfig, CorsConfig, Environment, IdentityConfig, LoggingSettings, MailConfig,
    SecurityConfig, ServerConfig,
};
