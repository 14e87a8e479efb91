//! Authentication flows used by the HTTP guards.

use std::sync::Arc;

use tracing::debug;

use crate::error::{IdentityError, IdentityResult};
use crate::provider::IdentityProvider;
use crate::role::ResolvedRole;
use crate::user::IdentityUser;

/// Verifies bearer tokens and resolves the caller's user record and role.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthService {
    /// Wrap an identity provider.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Verify `token` and load the user it names.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MissingToken`] for a blank token, otherwise any
    /// verification or lookup failure from the provider.
    pub async fn authenticate(&self, token: &str) -> IdentityResult<IdentityUser> {
        if token.trim().is_empty() {
            return Err(IdentityError::MissingToken);
        }
        let claims = self.provider.verify_token(token).await?;
        debug!(sub = %claims.sub, "session token verified");
        self.provider.get_user(&claims.sub).await
    }

    /// Verify `token` and read the caller's role from public metadata.
    ///
    /// # Errors
    ///
    /// Fails like [`AuthService::authenticate`], and with
    /// [`IdentityError::RoleMissing`] when the user has no role.
    pub async fn resolve_role(&self, token: &str) -> IdentityResult<ResolvedRole> {
        let user = self.authenticate(token).await?;
        let role = user
            .role_claim()
            .map(ResolvedRole::parse)
            .ok_or_else(|| IdentityError::RoleMissing {
                user_id: user.id.clone(),
            })?;
        debug!(user_id = %user.id, role = role.as_str(), "role resolved");
        Ok(role)
    }
}
