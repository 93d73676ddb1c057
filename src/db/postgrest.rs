// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgREST client with typed operations.
//!
//! Provides high-level operations for:
//! - Posts (insert, select joined with the author profile)
//! - Profiles (select by id, upsert)
//!
//! Requests carry the current session's access token so row-level security
//! applies; without a session the anon key is used as the bearer.

use crate::db::{tables, DataStore};
use crate::error::StoreError;
use crate::models::{FeedPost, NewPost, Post, Profile, Session};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

const PROFILE_SELECT: &str = "id,username,avatar_url";

/// PostgREST database client.
#[derive(Clone)]
pub struct PostgrestDb {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
    session: watch::Receiver<Option<Session>>,
}

impl PostgrestDb {
    /// Create a client for `{supabase_url}/rest/v1`.
    pub fn new(
        supabase_url: &str,
        anon_key: &str,
        session: watch::Receiver<Option<Session>>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
            session,
        }
    }

    fn bearer(&self) -> String {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    /// Send and decode a JSON array of rows.
    async fn rows<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::message(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::message(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(serde_json::from_str::<StoreError>(&body)
                .unwrap_or_else(|_| StoreError::message(format!("HTTP {}: {}", status, body))));
        }

        serde_json::from_str(&body)
            .map_err(|e| StoreError::message(format!("Unexpected row shape: {}", e)))
    }

    /// Decode a write that returns exactly the affected row.
    async fn single_row<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        table: &str,
    ) -> Result<T, StoreError> {
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::message(format!("Write to {} returned no rows", table)))
    }
}

/// `eq.` filter value for a query parameter.
fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl DataStore for PostgrestDb {
    async fn select_posts(&self, author_id: Option<&str>) -> Result<Vec<FeedPost>, StoreError> {
        let mut query = vec![("select", FeedPost::SELECT.to_string())];
        if let Some(id) = author_id {
            query.push(("user_id", eq(id)));
        }

        let posts: Vec<FeedPost> = self
            .rows(self.request(reqwest::Method::GET, tables::POSTS).query(&query))
            .await?;
        tracing::debug!(count = posts.len(), author = ?author_id, "Fetched posts");
        Ok(posts)
    }

    async fn insert_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let request = self
            .request(reqwest::Method::POST, tables::POSTS)
            .header("Prefer", "return=representation")
            .json(post);
        self.single_row(request, tables::POSTS).await
    }

    async fn select_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let request = self
            .request(reqwest::Method::GET, tables::PROFILES)
            .query(&[("select", PROFILE_SELECT.to_string()), ("id", eq(id))]);
        let profiles: Vec<Profile> = self.rows(request).await?;
        Ok(profiles.into_iter().next())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let request = self
            .request(reqwest::Method::POST, tables::PROFILES)
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[profile]);
        self.single_row(request, tables::PROFILES).await
    }
}
