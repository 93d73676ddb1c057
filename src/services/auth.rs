// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity service client and sign-in flows.
//!
//! Handles:
//! - Email/password sign-in and sign-up
//! - Sign-out (local session always cleared)
//! - Refresh-token grants for the session refresher

use crate::error::{AppError, Result};
use crate::models::session::TokenResponse;
use crate::models::{Session, SessionUser};
use crate::services::session::SessionStore;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Email and password as typed by the user.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::InvalidInput(validation_message(&e)))
    }
}

/// First human-readable message out of a validation failure.
pub(crate) fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

/// Result of a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Email confirmation is off; the user is signed in.
    SignedIn(Session),
    /// A confirmation email was sent; no session yet.
    PendingVerification,
}

/// Identity collaborator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session>;
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome>;
    async fn sign_out(&self, access_token: &str) -> Result<()>;
    async fn refresh(&self, refresh_token: &str) -> Result<Session>;
}

/// Supabase GoTrue client.
#[derive(Clone)]
pub struct GoTrueClient {
    http: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

/// Error body shapes GoTrue uses across versions.
#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl AuthErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

/// Sign-up returns a full token grant, or only the user when confirmation
/// is pending.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(TokenResponse),
    User(SessionUser),
}

impl GoTrueClient {
    /// Create a client for `{supabase_url}/auth/v1`.
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: format!("{}/auth/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> Result<Session> {
        let response = self
            .http
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Auth request failed: {}", e)))?;

        let token: TokenResponse = self.check_response_json(response).await?;
        Ok(token.into_session(Utc::now()))
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AuthErrorBody>(&body)
                .ok()
                .and_then(AuthErrorBody::into_message)
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body));
            return Err(AppError::Auth(message));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        self.token_grant(
            "password",
            serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }),
        )
        .await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome> {
        let response = self
            .http
            .post(format!("{}/signup", self.auth_url))
            .header("apikey", &self.anon_key)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Sign-up request failed: {}", e)))?;

        match self.check_response_json::<SignUpBody>(response).await? {
            SignUpBody::Session(token) => Ok(SignUpOutcome::SignedIn(token.into_session(Utc::now()))),
            SignUpBody::User(user) => {
                tracing::info!(user_id = %user.id, "Sign-up pending email verification");
                Ok(SignUpOutcome::PendingVerification)
            }
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Sign-out request failed: {}", e)))?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Auth(format!("HTTP {}: {}", status, body)))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        self.token_grant(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }
}

/// Sign-in flows bound to the app's session store.
#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>, sessions: SessionStore) -> Self {
        Self { identity, sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn identity(&self) -> Arc<dyn IdentityProvider> {
        self.identity.clone()
    }

    /// Sign in and publish the new session.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        credentials.check()?;
        let session = self.identity.sign_in(credentials).await?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.sessions.set(Some(session.clone()));
        Ok(session)
    }

    /// Sign up; publishes the session when one is issued.
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome> {
        credentials.check()?;
        let outcome = self.identity.sign_up(credentials).await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            tracing::info!(user_id = %session.user.id, "Signed up");
            self.sessions.set(Some(session.clone()));
        }
        Ok(outcome)
    }

    /// Sign out. The local session is cleared even if the remote call fails.
    pub async fn sign_out(&self) {
        if let Some(session) = self.sessions.current() {
            if let Err(e) = self.identity.sign_out(&session.access_token).await {
                tracing::warn!(error = %e, "Remote sign-out failed; clearing local session");
            }
        }
        self.sessions.set(None);
    }
}
