// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity client against a local stand-in server.

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use feedgram::error::AppError;
use feedgram::services::{Credentials, GoTrueClient, IdentityProvider, SignUpOutcome};
use serde_json::{json, Value};
use std::collections::HashMap;

mod common;

fn grant(user_id: &str) -> Value {
    json!({
        "access_token": format!("access-{}", user_id),
        "refresh_token": format!("refresh-{}", user_id),
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_900_000_000i64,
        "user": {"id": user_id, "email": "ana@example.com"}
    })
}

async fn token(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if headers.get("apikey").is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "No API key found in request"})));
    }
    match query.get("grant_type").map(String::as_str) {
        Some("password") if body["password"] == "secret" => (StatusCode::OK, Json(grant("u1"))),
        Some("password") => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid login credentials"})),
        ),
        Some("refresh_token") if body["refresh_token"] == "refresh-u1" => {
            (StatusCode::OK, Json(grant("u1")))
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": 400, "msg": "Invalid Refresh Token: Refresh Token Not Found"})),
        ),
    }
}

async fn signup(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default();
    if email.starts_with("verify") {
        return (
            StatusCode::OK,
            Json(json!({
                "id": "u2",
                "email": email,
                "confirmation_sent_at": "2026-10-19T10:00:00Z"
            })),
        );
    }
    (StatusCode::OK, Json(grant("u3")))
}

async fn logout(headers: HeaderMap) -> StatusCode {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer access-u1") => StatusCode::NO_CONTENT,
        _ => StatusCode::UNAUTHORIZED,
    }
}

async fn client() -> GoTrueClient {
    let router = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/logout", post(logout));
    let base = common::spawn_backend(router).await;
    GoTrueClient::new(&base, "test_anon_key")
}

#[tokio::test]
async fn test_password_grant() {
    let client = client().await;

    let session = client
        .sign_in(&Credentials::new("ana@example.com", "secret"))
        .await
        .unwrap();

    assert_eq!(session.user.id, "u1");
    assert_eq!(session.access_token, "access-u1");
    assert_eq!(session.expires_at.timestamp(), 1_900_000_000);
}

#[tokio::test]
async fn test_password_grant_error_description() {
    let client = client().await;

    let err = client
        .sign_in(&Credentials::new("ana@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Auth(ref m) if m == "Invalid login credentials"));
}

#[tokio::test]
async fn test_refresh_grant() {
    let client = client().await;

    let renewed = client.refresh("refresh-u1").await.unwrap();
    assert_eq!(renewed.user.id, "u1");

    let err = client.refresh("stale").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid Refresh Token: Refresh Token Not Found"
    );
}

#[tokio::test]
async fn test_sign_up_outcomes() {
    let client = client().await;

    let signed_in = client
        .sign_up(&Credentials::new("new@example.com", "pw"))
        .await
        .unwrap();
    assert!(matches!(signed_in, SignUpOutcome::SignedIn(ref s) if s.user.id == "u3"));

    let pending = client
        .sign_up(&Credentials::new("verify@example.com", "pw"))
        .await
        .unwrap();
    assert_eq!(pending, SignUpOutcome::PendingVerification);
}

#[tokio::test]
async fn test_sign_out_sends_bearer() {
    let client = client().await;

    client.sign_out("access-u1").await.unwrap();
    assert!(client.sign_out("someone-else").await.is_err());
}
