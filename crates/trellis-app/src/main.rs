#![forbid(unsafe_code)]
#![deny(
    unreachable_pub,
    clippy::all,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::pedantic, clippy::nursery)]

//! Binary entrypoint that loads configuration and serves the Trellis API.

use trellis_app::{AppResult, run_app};

/// Boots the service and blocks until a shutdown signal arrives.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
