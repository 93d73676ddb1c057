// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory collaborators for tests and offline runs.
//!
//! Each one counts its calls so a test can prove a flow stopped before
//! reaching the network.

use crate::error::{Alert, AppError, Result};
use crate::models::{Session, SessionUser, UploadedMedia};
use crate::screens::Notifier;
use crate::services::auth::{Credentials, IdentityProvider, SignUpOutcome};
use crate::services::media::{MediaFile, MediaHost};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// ─── Identity ────────────────────────────────────────────────

struct Account {
    user_id: String,
    password: String,
}

/// In-memory identity provider.
#[derive(Default)]
pub struct MemoryIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    /// refresh token -> user id
    refresh_tokens: Mutex<HashMap<String, String>>,
    issued: AtomicUsize,
    calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    require_verification: AtomicBool,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign-ups return no session while set.
    pub fn require_verification(&self, on: bool) {
        self.require_verification.store(on, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Mint a session for `user_id` valid for `ttl_secs`.
    pub fn issue_session(&self, user_id: &str, ttl_secs: i64) -> Session {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let refresh_token = format!("refresh-{}-{}", user_id, n);
        lock(&self.refresh_tokens).insert(refresh_token.clone(), user_id.to_string());

        Session {
            access_token: format!("access-{}-{}", user_id, n),
            refresh_token,
            token_type: "bearer".to_string(),
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
            user: SessionUser {
                id: user_id.to_string(),
                email: None,
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let user_id = {
            let accounts = lock(&self.accounts);
            match accounts.get(&credentials.email) {
                Some(a) if a.password == credentials.password => a.user_id.clone(),
                _ => return Err(AppError::Auth("Invalid login credentials".to_string())),
            }
        };
        Ok(self.issue_session(&user_id, 3600))
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let user_id = {
            let mut accounts = lock(&self.accounts);
            if accounts.contains_key(&credentials.email) {
                return Err(AppError::Auth("User already registered".to_string()));
            }
            let user_id = format!("user-{}", accounts.len() + 1);
            accounts.insert(
                credentials.email.clone(),
                Account {
                    user_id: user_id.clone(),
                    password: credentials.password.clone(),
                },
            );
            user_id
        };

        if self.require_verification.load(Ordering::SeqCst) {
            return Ok(SignUpOutcome::PendingVerification);
        }
        Ok(SignUpOutcome::SignedIn(self.issue_session(&user_id, 3600)))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let user_id = lock(&self.refresh_tokens)
            .remove(refresh_token)
            .ok_or_else(|| AppError::Auth("Invalid Refresh Token".to_string()))?;
        Ok(self.issue_session(&user_id, 3600))
    }
}

// ─── Media host ──────────────────────────────────────────────

/// In-memory media host. Public ids are `media-{n}`.
#[derive(Default)]
pub struct MemoryMediaHost {
    calls: AtomicUsize,
    uploads: Mutex<Vec<UploadedMedia>>,
    fail: AtomicBool,
}

impl MemoryMediaHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent upload.
    pub fn fail_uploads(&self, on: bool) {
        self.fail.store(on, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Successful uploads so far.
    pub fn uploads(&self) -> Vec<UploadedMedia> {
        lock(&self.uploads).clone()
    }
}

#[async_trait]
impl MediaHost for MemoryMediaHost {
    async fn upload(&self, file: MediaFile) -> Result<UploadedMedia> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail.load(Ordering::SeqCst) || file.bytes.is_empty() {
            return Err(AppError::UploadFailed("No secure_url returned".to_string()));
        }

        let public_id = format!("media-{}", n);
        let uploaded = UploadedMedia {
            secure_url: format!(
                "https://res.cloudinary.com/test-cloud/image/upload/{}.jpg",
                public_id
            ),
            public_id,
        };
        lock(&self.uploads).push(uploaded.clone());
        Ok(uploaded)
    }
}

// ─── Notifier ────────────────────────────────────────────────

/// Notifier that records alerts instead of showing them.
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        lock(&self.alerts).clone()
    }

    pub fn last(&self) -> Option<Alert> {
        lock(&self.alerts).last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, alert: Alert) {
        lock(&self.alerts).push(alert);
    }
}
