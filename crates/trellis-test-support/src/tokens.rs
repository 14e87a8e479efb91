//! RS256 session-token minting for tests.

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;

use crate::fixtures::{FOREIGN_SIGNING_KEY_PEM, SIGNING_KEY_PEM, TEST_AUDIENCE};

#[derive(Serialize)]
struct SessionClaims<'a> {
    sub: &'a str,
    aud: &'a str,
    iat: i64,
    nbf: i64,
    exp: i64,
    sid: &'a str,
}

/// Builder for signed session tokens.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    subject: String,
    audience: String,
    ttl_secs: i64,
    foreign_key: bool,
}

impl TokenBuilder {
    /// Token for `subject` with the test audience, valid for five minutes.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            audience: TEST_AUDIENCE.to_string(),
            ttl_secs: 300,
            foreign_key: false,
        }
    }

    /// Override the `aud` claim.
    #[must_use]
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Expire the token `secs` seconds from now; negative values mint expired tokens.
    #[must_use]
    pub const fn expires_in(mut self, secs: i64) -> Self {
        self.ttl_secs = secs;
        self
    }

    /// Sign with a key the service does not trust.
    #[must_use]
    pub const fn signed_by_foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    /// Encode and sign the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture key cannot be parsed or signing fails.
    pub fn mint(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let issued = now.min(now + self.ttl_secs) - 60;
        let claims = SessionClaims {
            sub: &self.subject,
            aud: &self.audience,
            iat: issued,
            nbf: issued,
            exp: now + self.ttl_secs,
            sid: "sess_test",
        };
        let pem = if self.foreign_key {
            FOREIGN_SIGNING_KEY_PEM
        } else {
            SIGNING_KEY_PEM
        };
        let key = EncodingKey::from_rsa_pem(pem.as_bytes())?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }
}

/// Valid token for `subject`.
///
/// # Errors
///
/// Returns an error if signing fails.
pub fn mint_token(subject: &str) -> Result<String> {
    TokenBuilder::new(subject).mint()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_token_has_three_segments() -> Result<()> {
        let token = mint_token("user_1")?;
        assert_eq!(token.split('.').count(), 3);
        let expired = TokenBuilder::new("user_1").expires_in(-600).mint()?;
        assert_ne!(token, expired);
        Ok(())
    }
}
