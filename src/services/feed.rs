// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed and profile post queries, and the display form of a post.

use crate::db::DataStore;
use crate::error::{AppError, Result};
use crate::models::{FeedPost, PostId};
use crate::services::media::{MediaUrls, Thumbnail};
use std::sync::Arc;

pub const DEFAULT_AVATAR_URL: &str = "https://via.placeholder.com/48";
pub const UNKNOWN_USERNAME: &str = "Unknown User";
pub const NO_CAPTION: &str = "No caption";

/// Avatar thumbnails are 48px squares centred on a face.
pub const AVATAR_SIZE: u32 = 48;

/// Read-only post queries. Every call re-fetches the full set.
#[derive(Clone)]
pub struct FeedService {
    store: Arc<dyn DataStore>,
}

impl FeedService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// All posts with their authors.
    pub async fn load_feed(&self) -> Result<Vec<FeedPost>> {
        let posts = self
            .store
            .select_posts(None)
            .await
            .map_err(AppError::QueryFailed)?;
        tracing::info!(count = posts.len(), "Fetched feed");
        Ok(posts)
    }

    /// Posts written by one user.
    pub async fn load_user_posts(&self, user_id: &str) -> Result<Vec<FeedPost>> {
        let posts = self
            .store
            .select_posts(Some(user_id))
            .await
            .map_err(AppError::QueryFailed)?;
        tracing::info!(count = posts.len(), user_id = %user_id, "Fetched user posts");
        Ok(posts)
    }
}

/// A post resolved for display, with placeholders filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub username: String,
    pub avatar_url: String,
    pub image_url: String,
    pub caption: String,
}

impl PostCard {
    /// Resolve `post` with a square image thumbnail of `image_size` pixels.
    pub fn new(post: &FeedPost, urls: &MediaUrls, image_size: u32) -> Self {
        let author = post.user.as_ref();
        let username = author
            .and_then(|a| a.username.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_USERNAME);
        let avatar = author
            .and_then(|a| a.avatar_url.as_deref())
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_AVATAR_URL);
        let caption = post
            .caption
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(NO_CAPTION);

        Self {
            id: post.id,
            username: username.to_string(),
            avatar_url: urls.url(avatar, Some(Thumbnail::square(AVATAR_SIZE).focus_face())),
            image_url: urls.url(&post.image, Some(Thumbnail::square(image_size))),
            caption: caption.to_string(),
        }
    }
}
