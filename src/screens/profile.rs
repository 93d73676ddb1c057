// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile: username, avatar, own posts, sign out.

use crate::error::{Alert, AppError};
use crate::models::FeedPost;
use crate::screens::{surface, Notifier, Route};
use crate::services::{AuthService, FeedService, MediaUrls, PostCard, ProfileForm, ProfileService};
use std::sync::Arc;

/// Thumbnail size for the profile's own post list.
pub const PROFILE_POST_SIZE: u32 = 200;

pub struct ProfileScreen {
    profiles: ProfileService,
    feed: FeedService,
    auth: AuthService,
    urls: MediaUrls,
    notifier: Arc<dyn Notifier>,
    pub username: String,
    /// Local file picked for upload, or the hosted URL of the current avatar
    pub avatar: Option<String>,
    posts: Vec<FeedPost>,
}

impl ProfileScreen {
    pub fn new(
        profiles: ProfileService,
        feed: FeedService,
        auth: AuthService,
        urls: MediaUrls,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            profiles,
            feed,
            auth,
            urls,
            notifier,
            username: String::new(),
            avatar: None,
            posts: Vec::new(),
        }
    }

    /// Load the profile and the user's posts. Does nothing when signed out.
    pub async fn mount(&mut self) {
        let Some(session) = self.auth.sessions().current() else {
            return;
        };

        match self.profiles.load(Some(&session)).await {
            Ok(Some(profile)) => {
                self.username = profile.username.unwrap_or_default();
                self.avatar = profile.avatar_url.map(|a| self.urls.url(&a, None));
            }
            Ok(None) => {}
            Err(e) => surface(
                self.notifier.as_ref(),
                "Error loading profile",
                &e,
                Alert::new("Error", "Failed to load profile."),
            ),
        }

        match self.feed.load_user_posts(session.user_id()).await {
            Ok(posts) => self.posts = posts,
            Err(e) => surface(
                self.notifier.as_ref(),
                "Error loading posts",
                &e,
                Alert::new("Error", "Failed to load posts."),
            ),
        }
    }

    /// The picker returned `path`, or `None` when cancelled.
    pub fn pick_avatar(&mut self, path: Option<String>) {
        if let Some(path) = path {
            self.avatar = Some(path);
        }
    }

    pub fn posts(&self) -> &[FeedPost] {
        &self.posts
    }

    pub fn cards(&self) -> Vec<PostCard> {
        self.posts
            .iter()
            .map(|p| PostCard::new(p, &self.urls, PROFILE_POST_SIZE))
            .collect()
    }

    /// Save username and avatar. Returns whether the update went through.
    pub async fn update_profile(&mut self) -> bool {
        let session = self.auth.sessions().current();
        let form = ProfileForm {
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        };

        match self.profiles.update(session.as_ref(), &form).await {
            Ok(_) => {
                self.notifier
                    .alert(Alert::new("Success", "Profile updated successfully!"));
                true
            }
            Err(e) => {
                let alert = match &e {
                    AppError::Unauthenticated => Alert::new(
                        "Error",
                        "You must be logged in to update your profile.",
                    ),
                    AppError::UploadFailed(_) => {
                        Alert::new("Error", "Failed to upload avatar. Please try again.")
                    }
                    AppError::PersistFailed { error, .. } => Alert::new(
                        "Error",
                        format!("Failed to update profile: {}", error.message),
                    ),
                    other => other.alert(),
                };
                surface(self.notifier.as_ref(), "Profile update failed", &e, alert);
                false
            }
        }
    }

    /// Sign out and go to the sign-in screen.
    pub async fn sign_out(&mut self) -> Route {
        self.auth.sign_out().await;
        self.username.clear();
        self.avatar = None;
        self.posts.clear();
        Route::SignIn
    }
}
