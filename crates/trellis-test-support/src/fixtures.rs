//! Key material and configuration fixtures.

use std::collections::HashMap;

use anyhow::Result;
use trellis_config::AppConfig;

/// RSA private key whose public half is [`VERIFYING_KEY_PEM`].
pub const SIGNING_KEY_PEM: &str = include_str!("../fixtures/signing_key.pem");
/// SPKI public key matching [`SIGNING_KEY_PEM`].
pub const VERIFYING_KEY_PEM: &str = include_str!("../fixtures/verifying_key.pem");
/// Unrelated RSA private key, for tokens that must fail signature checks.
pub const FOREIGN_SIGNING_KEY_PEM: &str = include_str!("../fixtures/foreign_signing_key.pem");

/// Audience expected by the sample configuration.
pub const TEST_AUDIENCE: &str = "http://localhost:3001";
/// Secret key used by the sample configuration.
pub const TEST_SECRET_KEY: &str = "sk_test_trellis";

/// Environment map containing every required variable.
///
/// `identity_api_url` points the identity client at a mock server.
#[must_use]
pub fn env_vars(identity_api_url: &str) -> HashMap<String, String> {
    [
        ("APP_NAME", "Trellis Test"),
        ("APP_ENV", "test"),
        ("CLERK_SECRET_KEY", TEST_SECRET_KEY),
        ("CLERK_JWT_KEY", VERIFYING_KEY_PEM),
        ("API_URL", TEST_AUDIENCE),
        ("CLERK_API_URL", identity_api_url),
        ("BASE_URL", "http://localhost:3000"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

/// Build an [`AppConfig`] from [`env_vars`] with `overrides` applied on top.
///
/// # Errors
///
/// Returns an error if the resulting variables fail validation.
pub fn sample_config(identity_api_url: &str, overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars = env_vars(identity_api_url);
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }
    Ok(AppConfig::from_lookup(|name| vars.get(name).cloned())?)
}
