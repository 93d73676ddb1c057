// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Authenticated session issued by the identity service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User id (UUID), also the profile primary key
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A time-limited session. The app only ever holds a read-only copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

impl Session {
    /// Id of the signed-in user.
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Whether the access token expires within `margin` of `now`.
    pub fn expires_within(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        self.expires_at - margin <= now
    }
}

/// Token grant response body from the identity service.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absolute expiry (Unix timestamp)
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl TokenResponse {
    /// Convert to a session, resolving the expiry against `now`.
    ///
    /// `expires_at` wins over `expires_in`; with neither, the token is
    /// treated as already expiring so the refresher renews it.
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)))
            .unwrap_or(now);

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type,
            expires_at,
            user: self.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_prefers_absolute_expiry() {
        let body = r#"{
            "access_token": "at",
            "refresh_token": "rt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1900000000,
            "user": {"id": "6f1c", "email": "a@b.co"}
        }"#;
        let response: TokenResponse = serde_json::from_str(body).unwrap();
        let session = response.into_session(Utc::now());

        assert_eq!(session.expires_at.timestamp(), 1_900_000_000);
        assert_eq!(session.user_id(), "6f1c");
    }

    #[test]
    fn test_expires_within() {
        let now = Utc::now();
        let body = r#"{"access_token":"at","refresh_token":"rt","expires_in":30,"user":{"id":"u"}}"#;
        let session = serde_json::from_str::<TokenResponse>(body)
            .unwrap()
            .into_session(now);

        assert_eq!(session.token_type, "bearer");
        assert!(session.expires_within(Duration::seconds(60), now));
        assert!(!session.expires_within(Duration::seconds(10), now));
    }
}
