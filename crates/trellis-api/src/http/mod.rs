//! HTTP layer: routes, middleware and handlers.

pub mod auth;
pub(crate) mod constants;
pub(crate) mod docs;
pub(crate) mod errors;
pub(crate) mod health;
pub(crate) mod mail;
pub(crate) mod profile;
pub mod router;
pub(crate) mod security;
pub(crate) mod telemetry;
pub(crate) mod uploads;
