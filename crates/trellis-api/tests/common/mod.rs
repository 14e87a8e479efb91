#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode},
};
use serde_json::{Map, Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use trellis_api::{ApiDependencies, ApiServer};
use trellis_identity::{
    EmailAddress, IdentityError, IdentityProvider, IdentityResult, IdentityUser, TokenClaims,
};
use trellis_mail::{
    MailError, MailResult, MailService, MailTransport, RenderedMail, TemplateRenderer,
};
use trellis_telemetry::Metrics;
use trellis_test_support::fixtures::sample_config;

pub const USER_TOKEN: &str = "user-token";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const SUPER_ADMIN_TOKEN: &str = "super-admin-token";
pub const UNKNOWN_ROLE_TOKEN: &str = "unknown-role-token";
pub const NO_ROLE_TOKEN: &str = "no-role-token";
/// Makes the stub identity provider panic mid-request.
pub const PANIC_TOKEN: &str = "panic-token";

/// Accepts a fixed set of tokens; the token doubles as the user id.
pub struct StubIdentity;

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn verify_token(&self, token: &str) -> IdentityResult<TokenClaims> {
        match token {
            USER_TOKEN | ADMIN_TOKEN | SUPER_ADMIN_TOKEN | UNKNOWN_ROLE_TOKEN | NO_ROLE_TOKEN => {
                Ok(TokenClaims {
                    sub: token.to_string(),
                    aud: None,
                    exp: i64::MAX,
                    iat: None,
                    nbf: None,
                    iss: None,
                    azp: None,
                    sid: None,
                })
            }
            PANIC_TOKEN => panic!("identity backend exploded"),
            _ => Err(IdentityError::UpstreamStatus { status: 401 }),
        }
    }

    async fn get_user(&self, user_id: &str) -> IdentityResult<IdentityUser> {
        let role = match user_id {
            USER_TOKEN => Some("user"),
            ADMIN_TOKEN => Some("admin"),
            SUPER_ADMIN_TOKEN => Some("super-admin"),
            UNKNOWN_ROLE_TOKEN => Some("owner"),
            _ => None,
        };
        let mut public_metadata = Map::new();
        if let Some(role) = role {
            public_metadata.insert("role".into(), json!(role));
        }
        Ok(IdentityUser {
            id: user_id.to_string(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            image_url: None,
            primary_email_address_id: Some("idn_1".into()),
            email_addresses: vec![EmailAddress {
                id: "idn_1".into(),
                email_address: "ada@example.com".into(),
            }],
            public_metadata,
            created_at: Some(1_700_000_000_000),
            updated_at: None,
        })
    }
}

#[derive(Default)]
pub struct Outbox(pub Mutex<Vec<RenderedMail>>);

#[async_trait]
impl MailTransport for Outbox {
    async fn deliver(&self, mail: RenderedMail) -> MailResult<()> {
        if let Ok(mut sent) = self.0.lock() {
            sent.push(mail);
        }
        Ok(())
    }
}

/// Transport whose relay always refuses the message.
pub struct RejectingRelay;

#[async_trait]
impl MailTransport for RejectingRelay {
    async fn deliver(&self, _mail: RenderedMail) -> MailResult<()> {
        Err(MailError::Build {
            source: lettre::error::Error::MissingFrom,
        })
    }
}

impl Outbox {
    pub fn sent(&self) -> Result<Vec<RenderedMail>> {
        Ok(self.0.lock().map_err(|_| anyhow!("outbox poisoned"))?.clone())
    }
}

pub struct Harness {
    pub router: Router,
    pub metrics: Metrics,
    pub outbox: Arc<Outbox>,
    pub static_root: PathBuf,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

pub struct HarnessOptions<'a> {
    pub overrides: &'a [(&'a str, &'a str)],
    pub mail: bool,
    pub rejecting_relay: bool,
}

impl Default for HarnessOptions<'_> {
    fn default() -> Self {
        Self {
            overrides: &[],
            mail: true,
            rejecting_relay: false,
        }
    }
}

pub fn harness() -> Result<Harness> {
    harness_with(HarnessOptions::default())
}

pub fn harness_with(options: HarnessOptions<'_>) -> Result<Harness> {
    let dir = tempfile::tempdir()?;
    let static_root = dir.path().join("public");
    let upload_dir = static_root.join("uploads");
    let static_root_var = static_root.to_string_lossy().into_owned();
    let upload_dir_var = upload_dir.to_string_lossy().into_owned();

    let mut vars = vec![
        ("STATIC_ROOT", static_root_var.as_str()),
        ("UPLOAD_DIR", upload_dir_var.as_str()),
        ("BODY_LIMIT_BYTES", "1024"),
    ];
    vars.extend_from_slice(options.overrides);
    let config = sample_config("http://127.0.0.1:9/v1", &vars)?;

    let metrics = Metrics::new()?;
    let outbox = Arc::new(Outbox::default());
    let mail = if options.mail {
        let transport: Arc<dyn MailTransport> = if options.rejecting_relay {
            Arc::new(RejectingRelay)
        } else {
            Arc::clone(&outbox) as Arc<dyn MailTransport>
        };
        Some(MailService::new(
            TemplateRenderer::from_source("Hello {{firstName}} {{lastName}}")?,
            transport,
            "Welcome",
            None,
        ))
    } else {
        None
    };

    let server = ApiServer::new(
        &config,
        ApiDependencies {
            identity: Arc::new(StubIdentity),
            mail,
            metrics: metrics.clone(),
        },
    )?;

    Ok(Harness {
        router: server.into_router(),
        metrics,
        outbox,
        static_root,
        upload_dir,
        _dir: dir,
    })
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

impl Harness {
    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await?.to_vec();
        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty())?).await
    }
}
