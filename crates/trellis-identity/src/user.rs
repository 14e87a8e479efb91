//! User records returned by the identity provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user as returned by `GET /users/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IdentityUser {
    /// Provider user identifier.
    pub id: String,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Identifier of the primary entry in `email_addresses`.
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    /// Every email address attached to the account.
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    /// Metadata readable by the frontend; `role` lives here.
    #[serde(default)]
    pub public_metadata: Map<String, Value>,
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Last update time in epoch milliseconds.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Email address entry on a user record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmailAddress {
    /// Entry identifier.
    pub id: String,
    /// The address itself.
    pub email_address: String,
}

impl IdentityUser {
    /// Primary email, falling back to the first listed address.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        let primary = self.primary_email_address_id.as_deref();
        self.email_addresses
            .iter()
            .find(|entry| Some(entry.id.as_str()) == primary)
            .or_else(|| self.email_addresses.first())
            .map(|entry| entry.email_address.as_str())
    }

    /// Non-empty `public_metadata.role` string, if any.
    #[must_use]
    pub fn role_claim(&self) -> Option<&str> {
        self.public_metadata
            .get("role")
            .and_then(Value::as_str)
            .filter(|role| !role.trim().is_empty())
    }
}
