//! Session-token claims.

use serde::Deserialize;

/// Claims carried by a verified session token.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject: the provider's user identifier.
    pub sub: String,
    /// Intended audience.
    #[serde(default)]
    pub aud: Option<Audience>,
    /// Expiry (seconds since the epoch).
    pub exp: i64,
    /// Issued-at (seconds since the epoch).
    #[serde(default)]
    pub iat: Option<i64>,
    /// Not-before (seconds since the epoch).
    #[serde(default)]
    pub nbf: Option<i64>,
    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,
    /// Authorized party (originating frontend).
    #[serde(default)]
    pub azp: Option<String>,
    /// Session identifier.
    #[serde(default)]
    pub sid: Option<String>,
}

/// `aud` claim, which may be a single string or a list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience.
    One(String),
    /// Multiple audiences.
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is among the listed values.
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::One(value) => value == audience,
            Self::Many(values) => values.iter().any(|value| value == audience),
        }
    }
}
