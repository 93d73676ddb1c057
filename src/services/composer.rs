// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post composer: upload the picked image, then insert the post row.
//!
//! ```text
//! Idle → Validating → Uploading → Persisting → Done
//!            │            │            │
//!            └────────────┴────────────┴──────→ Failed
//! ```
//!
//! A failed insert leaves the uploaded image on the media host. An unsigned
//! client has no way to delete it, so the orphan is logged and reported in
//! the error instead.

use crate::db::DataStore;
use crate::error::{AppError, Result};
use crate::models::{NewPost, Post, Session};
use crate::services::media::{upload_image, MediaHost};
use std::sync::Arc;

/// Where the composer is in the post-creation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Idle,
    Validating,
    Uploading,
    Persisting,
    Done,
    Failed,
}

/// Caption and picked image for a post being written.
pub struct PostComposer {
    store: Arc<dyn DataStore>,
    media: Arc<dyn MediaHost>,
    caption: String,
    image: Option<String>,
    state: ComposerState,
}

impl PostComposer {
    pub fn new(store: Arc<dyn DataStore>, media: Arc<dyn MediaHost>) -> Self {
        Self {
            store,
            media,
            caption: String::new(),
            image: None,
            state: ComposerState::Idle,
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Select a local image (path or `file://` URI).
    pub fn set_image(&mut self, image: Option<String>) {
        self.image = image;
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    fn transition(&mut self, next: ComposerState) {
        tracing::debug!(from = ?self.state, to = ?next, "Composer state");
        self.state = next;
    }

    /// Back to `Idle` after the outcome has been shown. Fields are kept.
    pub fn return_to_idle(&mut self) {
        self.transition(ComposerState::Idle);
    }

    /// Run the full flow. On success the composer is cleared and the stored
    /// row is returned.
    pub async fn submit(&mut self, session: Option<&Session>) -> Result<Post> {
        match self.run(session).await {
            Ok(post) => {
                self.caption.clear();
                self.image = None;
                self.transition(ComposerState::Done);
                Ok(post)
            }
            Err(e) => {
                self.transition(ComposerState::Failed);
                Err(e)
            }
        }
    }

    async fn run(&mut self, session: Option<&Session>) -> Result<Post> {
        self.transition(ComposerState::Validating);
        let session = session.ok_or(AppError::Unauthenticated)?;
        let image = self
            .image
            .clone()
            .filter(|i| !i.trim().is_empty())
            .ok_or(AppError::MissingImage)?;

        self.transition(ComposerState::Uploading);
        let uploaded = upload_image(self.media.as_ref(), &image)
            .await
            .map_err(into_upload_failed)?;

        self.transition(ComposerState::Persisting);
        let caption = self.caption.trim();
        let new_post = NewPost {
            caption: (!caption.is_empty()).then(|| caption.to_string()),
            image: uploaded.public_id.clone(),
            user_id: session.user_id().to_string(),
        };

        let post = self.store.insert_post(&new_post).await.map_err(|error| {
            tracing::warn!(public_id = %uploaded.public_id, "Post insert failed after upload");
            AppError::PersistFailed {
                error,
                orphaned_media: Some(uploaded.public_id.clone()),
            }
        })?;

        tracing::info!(post_id = post.id, user_id = %post.user_id, "Post created");
        Ok(post)
    }
}

/// Any error once an upload has started is an upload failure.
pub(crate) fn into_upload_failed(e: AppError) -> AppError {
    match e {
        AppError::UploadFailed(msg) | AppError::InvalidInput(msg) => AppError::UploadFailed(msg),
        other => AppError::UploadFailed(other.to_string()),
    }
}
