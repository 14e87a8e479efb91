//! Seam between the authentication flows and the identity backend.

use async_trait::async_trait;

use crate::claims::TokenClaims;
use crate::error::IdentityResult;
use crate::user::IdentityUser;

/// Operations the service needs from an identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a session token and return its claims.
    async fn verify_token(&self, token: &str) -> IdentityResult<TokenClaims>;

    /// Fetch the user record for `user_id`.
    async fn get_user(&self, user_id: &str) -> IdentityResult<IdentityUser>;
}
