// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile load and update for the signed-in user.

use crate::db::DataStore;
use crate::error::{AppError, Result};
use crate::models::{Profile, Session};
use crate::services::auth::validation_message;
use crate::services::composer::into_upload_failed;
use crate::services::media::{upload_image, MediaHost};
use std::sync::Arc;
use validator::Validate;

/// Avatar values with this prefix are already hosted and are stored as-is.
pub const REMOTE_AVATAR_PREFIX: &str = "https://";

/// Editable profile fields.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileForm {
    #[validate(length(max = 50, message = "Username must be at most 50 characters"))]
    pub username: String,
    /// Local file to upload, or an already-hosted https URL
    pub avatar: Option<String>,
}

/// Reads and upserts the profile row owned by the session user.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn DataStore>,
    media: Arc<dyn MediaHost>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DataStore>, media: Arc<dyn MediaHost>) -> Self {
        Self { store, media }
    }

    /// Load the session user's profile. A missing row is `None`.
    pub async fn load(&self, session: Option<&Session>) -> Result<Option<Profile>> {
        let session = session.ok_or(AppError::Unauthenticated)?;
        self.store
            .select_profile(session.user_id())
            .await
            .map_err(AppError::QueryFailed)
    }

    /// Upsert the session user's profile from `form`.
    ///
    /// A local avatar is uploaded first and stored by public id; an https
    /// avatar is passed through without touching the media host.
    pub async fn update(&self, session: Option<&Session>, form: &ProfileForm) -> Result<Profile> {
        let session = session.ok_or(AppError::Unauthenticated)?;
        form.validate()
            .map_err(|e| AppError::InvalidInput(validation_message(&e)))?;

        let avatar_url = match form.avatar.as_deref().filter(|a| !a.is_empty()) {
            Some(avatar) if avatar.starts_with(REMOTE_AVATAR_PREFIX) => Some(avatar.to_string()),
            Some(local) => {
                let uploaded = upload_image(self.media.as_ref(), local)
                    .await
                    .map_err(into_upload_failed)?;
                Some(uploaded.public_id)
            }
            None => None,
        };

        let username = form.username.trim();
        let profile = Profile {
            id: session.user_id().to_string(),
            username: (!username.is_empty()).then(|| username.to_string()),
            avatar_url,
        };

        let stored = self
            .store
            .upsert_profile(&profile)
            .await
            .map_err(|error| AppError::PersistFailed {
                error,
                orphaned_media: None,
            })?;
        tracing::info!(user_id = %stored.id, "Profile updated");
        Ok(stored)
    }
}
