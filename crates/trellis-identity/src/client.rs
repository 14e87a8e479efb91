//! HTTP + RS256 implementation of [`IdentityProvider`].
//!
//! # Design
//! - Tokens are verified locally against the configured PEM key; no JWKS fetch.
//! - User lookups call the provider backend API with the secret key.
//! - No retries or caching; one upstream call per lookup.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use trellis_config::IdentityConfig;

use crate::claims::TokenClaims;
use crate::error::{IdentityError, IdentityResult};
use crate::provider::IdentityProvider;
use crate::user::IdentityUser;

/// Clock skew tolerated on `exp` and `nbf`, in seconds.
pub const CLOCK_LEEWAY_SECS: u64 = 5;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity client for Clerk-compatible backends.
pub struct ClerkClient {
    http: reqwest::Client,
    api_base_url: Url,
    secret_key: SecretString,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl ClerkClient {
    /// Build a client from the identity configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the PEM key cannot be parsed, the base URL cannot
    /// carry path segments, or the HTTP client cannot be built.
    pub fn new(config: &IdentityConfig) -> IdentityResult<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(config.jwt_public_key.as_bytes())
            .map_err(|source| IdentityError::InvalidKey { source })?;
        if config.api_base_url.cannot_be_a_base() {
            return Err(IdentityError::InvalidBaseUrl {
                url: config.api_base_url.to_string(),
            });
        }

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = CLOCK_LEEWAY_SECS;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("trellis/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| IdentityError::ClientBuild { source })?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.clone(),
            secret_key: SecretString::from(config.secret_key.expose_secret().to_owned()),
            decoding_key,
            validation,
        })
    }

    fn user_url(&self, user_id: &str) -> IdentityResult<Url> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|()| IdentityError::InvalidBaseUrl {
                url: self.api_base_url.to_string(),
            })?
            .pop_if_empty()
            .push("users")
            .push(user_id);
        Ok(url)
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    async fn verify_token(&self, token: &str) -> IdentityResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|source| IdentityError::InvalidToken { source })
    }

    async fn get_user(&self, user_id: &str) -> IdentityResult<IdentityUser> {
        let url = self.user_url(user_id)?;
        debug!(user_id, "fetching identity user");
        let response = self
            .http
            .get(url)
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await
            .map_err(|source| IdentityError::Transport { source })?;

        match response.status() {
            status if status.is_success() => response
                .json::<IdentityUser>()
                .await
                .map_err(|source| IdentityError::Transport { source }),
            StatusCode::NOT_FOUND => Err(IdentityError::UserNotFound {
                user_id: user_id.to_string(),
            }),
            status => Err(IdentityError::UpstreamStatus {
                status: status.as_u16(),
            }),
        }
    }
}
