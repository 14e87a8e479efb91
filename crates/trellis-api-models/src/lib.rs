#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]
//! Shared HTTP DTOs for the Trellis public API.
//!
//! Field names follow the JSON contract (`camelCase`) so the schemas emitted
//! into the `OpenAPI` document match what clients see on the wire.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// HTTP status code.
    pub status_code: u16,
    /// Human-readable message.
    pub message: String,
}

/// Greeting returned from `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct WelcomeResponse {
    /// `Welcome to {name} API`.
    pub message: String,
}

/// Liveness report returned from `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// Current time, RFC 3339 with millisecond precision in UTC.
    pub timestamp: String,
    /// Seconds since the process started.
    pub uptime: f64,
}

/// Generic single-message response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct MessageResponse {
    /// Outcome description.
    pub message: String,
}

impl MessageResponse {
    /// Build a response carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Profile of the signed-in user returned from `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity provider user id.
    pub id: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Primary email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub image_url: Option<String>,
    /// Role from public metadata, if any.
    pub role: Option<String>,
    /// Account creation time in epoch milliseconds.
    pub created_at: Option<i64>,
    /// Last update time in epoch milliseconds.
    pub updated_at: Option<i64>,
}

/// Role granted to the caller, returned by the role-guarded endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct RoleResponse {
    /// Role name (`admin`, `super-admin`).
    pub role: String,
}

/// Payload for `POST /api/email`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    /// Recipient address.
    pub email: String,
    /// Recipient given name.
    pub first_name: String,
    /// Recipient family name.
    pub last_name: String,
}

impl SendEmailRequest {
    /// Check that no field is blank, returning the offending field name.
    ///
    /// # Errors
    ///
    /// Returns the JSON name of the first blank field.
    pub fn validate(&self) -> Result<(), &'static str> {
        [
            ("email", &self.email),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |(field, _)| Err(field))
    }
}

/// One stored upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Multipart field name.
    pub field_name: String,
    /// File name supplied by the client.
    pub original_name: String,
    /// Name the file was stored under.
    pub file_name: String,
    /// Size in bytes.
    pub size: u64,
    /// Content type supplied by the client.
    pub content_type: Option<String>,
    /// Public URL under `/public/`.
    pub url: String,
}

/// Result of `POST /api/uploads`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct UploadResponse {
    /// Stored files in submission order.
    pub files: Vec<UploadedFile>,
}
