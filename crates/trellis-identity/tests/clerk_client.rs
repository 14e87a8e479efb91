use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use trellis_identity::{AuthService, ClerkClient, IdentityError, IdentityProvider, ResolvedRole, Role};
use trellis_test_support::fixtures::{TEST_AUDIENCE, TEST_SECRET_KEY, sample_config};
use trellis_test_support::tokens::{TokenBuilder, mint_token};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Result<ClerkClient> {
    let config = sample_config(&format!("{}/v1", server.uri()), &[])?;
    Ok(ClerkClient::new(&config.identity)?)
}

fn user_body(id: &str, role: Option<&str>) -> serde_json::Value {
    let metadata = role.map_or_else(|| json!({}), |role| json!({ "role": role }));
    json!({
        "id": id,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "image_url": "https://img.example.com/ada.png",
        "primary_email_address_id": "idn_1",
        "email_addresses": [{"id": "idn_1", "email_address": "ada@example.com"}],
        "public_metadata": metadata,
        "created_at": 1_700_000_000_000_i64,
        "updated_at": 1_700_000_100_000_i64
    })
}

#[tokio::test]
async fn valid_token_verifies_and_exposes_claims() -> Result<()> {
    let server = MockServer::start().await;
    let client = client_for(&server)?;

    let claims = client.verify_token(&mint_token("user_1")?).await?;
    assert_eq!(claims.sub, "user_1");
    assert!(claims.aud.is_some_and(|aud| aud.contains(TEST_AUDIENCE)));
    assert_eq!(claims.sid.as_deref(), Some("sess_test"));
    Ok(())
}

#[tokio::test]
async fn wrong_audience_expired_and_foreign_tokens_are_rejected() -> Result<()> {
    let server = MockServer::start().await;
    let client = client_for(&server)?;

    let tokens = [
        TokenBuilder::new("user_1")
            .audience("https://someone-else.example.com")
            .mint()?,
        TokenBuilder::new("user_1").expires_in(-120).mint()?,
        TokenBuilder::new("user_1").signed_by_foreign_key().mint()?,
        "not.a.jwt".to_string(),
    ];
    for token in tokens {
        let result = client.verify_token(&token).await;
        assert!(
            matches!(result, Err(IdentityError::InvalidToken { .. })),
            "token should be rejected: {token}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn get_user_sends_secret_key_and_decodes_record() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/user_1"))
        .and(header(
            "authorization",
            format!("Bearer {TEST_SECRET_KEY}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("user_1", Some("admin"))))
        .expect(1)
        .mount(&server)
        .await;

    let user = client_for(&server)?.get_user("user_1").await?;
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
    assert_eq!(user.primary_email(), Some("ada@example.com"));
    assert_eq!(user.role_claim(), Some("admin"));
    Ok(())
}

#[tokio::test]
async fn upstream_statuses_map_to_typed_errors() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    assert!(matches!(
        client.get_user("ghost").await,
        Err(IdentityError::UserNotFound { user_id }) if user_id == "ghost"
    ));
    assert!(matches!(
        client.get_user("broken").await,
        Err(IdentityError::UpstreamStatus { status: 503 })
    ));
    Ok(())
}

#[tokio::test]
async fn auth_service_resolves_role_end_to_end() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/user_root"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(user_body("user_root", Some("super-admin"))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/user_plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("user_plain", None)))
        .mount(&server)
        .await;

    let service = AuthService::new(Arc::new(client_for(&server)?));

    let role = service.resolve_role(&mint_token("user_root")?).await?;
    assert_eq!(role, ResolvedRole::Known(Role::SuperAdmin));

    let missing = service.resolve_role(&mint_token("user_plain")?).await;
    assert!(matches!(missing, Err(IdentityError::RoleMissing { .. })));

    let user = service.authenticate(&mint_token("user_plain")?).await?;
    assert_eq!(user.id, "user_plain");
    Ok(())
}
