mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};

use common::{ADMIN_TOKEN, Harness, HarnessOptions, USER_TOKEN, harness, harness_with};

async fn post_email(app: &Harness, token: &str, body: &Value) -> Result<common::TestResponse> {
    post_raw(app, token, body.to_string()).await
}

async fn post_raw(app: &Harness, token: &str, body: String) -> Result<common::TestResponse> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/email")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body))?;
    app.send(request).await
}

fn valid_payload() -> Value {
    json!({"email": "grace@example.com", "firstName": "Grace", "lastName": "Hopper"})
}

#[tokio::test]
async fn admins_can_send_the_templated_email() -> Result<()> {
    let app = harness()?;
    let response = post_email(&app, ADMIN_TOKEN, &valid_payload()).await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()?, json!({"message": "Email sent"}));

    let sent = app.outbox.sent()?;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "grace@example.com");
    assert_eq!(sent[0].subject, "Welcome");
    assert_eq!(sent[0].html, "Hello Grace Hopper");
    assert_eq!(app.metrics.snapshot().emails_sent, 1);
    Ok(())
}

#[tokio::test]
async fn plain_users_are_forbidden() -> Result<()> {
    let app = harness()?;
    let response = post_email(&app, USER_TOKEN, &valid_payload()).await?;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.outbox.sent()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_payloads_are_bad_requests() -> Result<()> {
    let app = harness()?;

    let blank = post_email(
        &app,
        ADMIN_TOKEN,
        &json!({"email": "grace@example.com", "firstName": " ", "lastName": "Hopper"}),
    )
    .await?;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        blank.json()?,
        json!({"statusCode": 400, "message": "firstName should not be empty"})
    );

    let missing_field = post_email(&app, ADMIN_TOKEN, &json!({"email": "grace@example.com"})).await?;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);

    let malformed = post_raw(&app, ADMIN_TOKEN, "{not json".to_string()).await?;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.json()?["statusCode"], 400);

    let bad_address = post_email(
        &app,
        ADMIN_TOKEN,
        &json!({"email": "not-an-address", "firstName": "Grace", "lastName": "Hopper"}),
    )
    .await?;
    assert_eq!(bad_address.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        bad_address.json()?["message"],
        "email must be a valid email address"
    );

    assert!(app.outbox.sent()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn unconfigured_mail_is_unavailable() -> Result<()> {
    let app = harness_with(HarnessOptions {
        mail: false,
        ..HarnessOptions::default()
    })?;
    let response = post_email(&app, ADMIN_TOKEN, &valid_payload()).await?;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()?["statusCode"], 503);
    Ok(())
}

#[tokio::test]
async fn relay_failures_surface_as_generic_internal_errors() -> Result<()> {
    let app = harness_with(HarnessOptions {
        rejecting_relay: true,
        ..HarnessOptions::default()
    })?;
    let response = post_email(&app, ADMIN_TOKEN, &valid_payload()).await?;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json()?,
        json!({"statusCode": 500, "message": "Internal server error"})
    );

    let snapshot = app.metrics.snapshot();
    assert_eq!(snapshot.emails_failed, 1);
    assert_eq!(snapshot.emails_sent, 0);
    assert!(app.outbox.sent()?.is_empty());
    Ok(())
}
