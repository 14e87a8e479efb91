#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Telemetry primitives shared across the Trellis workspace.
//!
//! Logging setup, request-id layers, task-local request context, the
//! Prometheus registry and `OpenAPI` artifact persistence live here so the
//! API and the binary agree on one observability story.

pub mod context;
pub mod error;
pub mod init;
pub mod layers;
pub mod metrics;
pub mod openapi;

pub use context::{GlobalContextGuard, current_request_id, current_route, with_request_context};
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
pub use layers::{propagate_request_id_layer, set_request_id_layer};
pub use metrics::{Metrics, MetricsSnapshot};
pub use openapi::persist_openapi;
