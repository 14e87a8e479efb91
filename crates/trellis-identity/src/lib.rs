#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Identity provider integration: session-token verification, user lookup
//! and role resolution.
//!
//! Layout: `provider.rs` (the [`IdentityProvider`] seam), `client.rs`
//! (HTTP + RS256 implementation), `service.rs` (authentication flows used by
//! the HTTP guards), `claims.rs`/`user.rs`/`role.rs` (data), `error.rs`.

pub mod claims;
pub mod client;
pub mod error;
pub mod provider;
pub mod role;
pub mod service;
pub mod user;

pub use claims::{Audience, TokenClaims};
pub use client::ClerkClient;
pub use error::{IdentityError, IdentityResult};
pub use provider::IdentityProvider;
pub use role::{ResolvedRole, Role};
pub use service::AuthService;
pub use user::{EmailAddress, IdentityUser};
