// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screens: per-screen state, calls into services, and user alerts.
//!
//! Each screen owns its fields. Errors are caught where the failing call
//! returns, logged, shown through the [`Notifier`], and the screen stays
//! usable.

pub mod feed;
pub mod new_post;
pub mod profile;
pub mod sign_in;

pub use feed::FeedScreen;
pub use new_post::NewPostScreen;
pub use profile::ProfileScreen;
pub use sign_in::SignInScreen;

use crate::error::{Alert, AppError};
use crate::models::Session;
use crate::services::SessionStore;
use tokio::sync::watch;

/// Shows blocking alerts to the user.
pub trait Notifier: Send + Sync {
    fn alert(&self, alert: Alert);
}

/// Notifier for headless runs: alerts go to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, alert: Alert) {
        tracing::info!(title = %alert.title, message = %alert.message, "Alert");
    }
}

/// Log `err` and show `alert`.
pub(crate) fn surface(notifier: &dyn Notifier, context: &str, err: &AppError, alert: Alert) {
    err.log(context);
    notifier.alert(alert);
}

/// Screen groups the app navigates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated group
    SignIn,
    /// Authenticated tabs, landing on the feed
    Feed,
    NewPost,
    Profile,
}

impl Route {
    pub fn requires_session(self) -> bool {
        !matches!(self, Route::SignIn)
    }
}

/// Routes between the signed-in tabs and the sign-in screen.
pub struct AuthGate {
    sessions: watch::Receiver<Option<Session>>,
}

impl AuthGate {
    pub fn new(sessions: &SessionStore) -> Self {
        Self {
            sessions: sessions.subscribe(),
        }
    }

    /// Landing route for the current session.
    pub fn route(&self) -> Route {
        if self.sessions.borrow().is_some() {
            Route::Feed
        } else {
            Route::SignIn
        }
    }

    /// Where a request to open `target` actually lands.
    pub fn enter(&self, target: Route) -> Route {
        let signed_in = self.sessions.borrow().is_some();
        match (target.requires_session(), signed_in) {
            (true, false) => Route::SignIn,
            (false, true) => Route::Feed,
            _ => target,
        }
    }

    /// Wait for the session to change and return the new landing route.
    ///
    /// Returns `None` once the session store is gone.
    pub async fn changed(&mut self) -> Option<Route> {
        self.sessions.changed().await.ok()?;
        Some(self.route())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryIdentity;

    #[tokio::test]
    async fn test_gate_redirects() {
        let store = SessionStore::new();
        let mut gate = AuthGate::new(&store);

        assert_eq!(gate.route(), Route::SignIn);
        assert_eq!(gate.enter(Route::Profile), Route::SignIn);
        assert_eq!(gate.enter(Route::SignIn), Route::SignIn);

        store.set(Some(MemoryIdentity::new().issue_session("u1", 3600)));
        assert_eq!(gate.changed().await, Some(Route::Feed));
        assert_eq!(gate.enter(Route::SignIn), Route::Feed);
        assert_eq!(gate.enter(Route::NewPost), Route::NewPost);

        store.set(None);
        assert_eq!(gate.changed().await, Some(Route::SignIn));
    }
}
