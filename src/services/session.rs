// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session holder and lifecycle-driven token refresh.
//!
//! The current session is published through a watch channel; the store
//! client and the auth gate subscribe to it. Refresh runs only while the
//! app is in the foreground.

use crate::models::Session;
use crate::services::auth::IdentityProvider;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Renew the session once it is this close to expiry.
const REFRESH_MARGIN_SECS: i64 = 60;

/// How often the refresher checks the session.
const DEFAULT_TICK: std::time::Duration = std::time::Duration::from_secs(30);

/// Holder of the current session with change notifications.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Replace the session and notify subscribers.
    pub fn set(&self, session: Option<Session>) {
        match &session {
            Some(s) => tracing::info!(user_id = %s.user.id, "Session updated"),
            None => tracing::info!("Session cleared"),
        }
        self.tx.send_replace(session);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

/// Foreground/background state reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Background,
}

/// Whether automatic session refresh is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Refreshing,
    Suspended,
}

/// Background token refresher toggled by lifecycle transitions.
pub struct SessionRefresher {
    identity: Arc<dyn IdentityProvider>,
    sessions: SessionStore,
    tick: std::time::Duration,
    task: Option<JoinHandle<()>>,
}

impl SessionRefresher {
    pub fn new(identity: Arc<dyn IdentityProvider>, sessions: SessionStore) -> Self {
        Self {
            identity,
            sessions,
            tick: DEFAULT_TICK,
            task: None,
        }
    }

    /// Override the check interval.
    pub fn with_tick(mut self, tick: std::time::Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn state(&self) -> RefreshState {
        match &self.task {
            Some(task) if !task.is_finished() => RefreshState::Refreshing,
            _ => RefreshState::Suspended,
        }
    }

    /// Apply a lifecycle transition.
    pub fn on_lifecycle(&mut self, lifecycle: Lifecycle) {
        match lifecycle {
            Lifecycle::Active => self.start(),
            Lifecycle::Background => self.stop(),
        }
    }

    /// Start refreshing. No-op if already running.
    pub fn start(&mut self) {
        if self.state() == RefreshState::Refreshing {
            return;
        }

        let identity = self.identity.clone();
        let sessions = self.sessions.clone();
        let tick = self.tick;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                refresh_if_expiring(identity.as_ref(), &sessions).await;
            }
        }));
        tracing::debug!("Session auto-refresh started");
    }

    /// Stop refreshing. A refresh already in flight is dropped.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Session auto-refresh stopped");
        }
    }
}

impl Drop for SessionRefresher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Renew the current session if it is close to expiry.
///
/// Returns `true` when a new session was published. Failures are logged and
/// leave the current session in place.
pub async fn refresh_if_expiring(identity: &dyn IdentityProvider, sessions: &SessionStore) -> bool {
    let Some(session) = sessions.current() else {
        return false;
    };
    if !session.expires_within(Duration::seconds(REFRESH_MARGIN_SECS), Utc::now()) {
        return false;
    }

    match identity.refresh(&session.refresh_token).await {
        Ok(renewed) => {
            sessions.set(Some(renewed));
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %session.user.id, "Session refresh failed");
            false
        }
    }
}
