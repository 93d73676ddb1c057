// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Feedgram: client core for a photo-sharing feed
//!
//! This crate signs users in against Supabase Auth, reads and writes posts
//! and profiles through PostgREST, and stores images on Cloudinary. Screens
//! are plain structs that own their state; rendering is left to the host.

pub mod config;
pub mod db;
pub mod error;
pub mod mock;
pub mod models;
pub mod screens;
pub mod services;

use config::Config;
use db::{DataStore, PostgrestDb};
use screens::{AuthGate, FeedScreen, NewPostScreen, Notifier, ProfileScreen, SignInScreen};
use services::{
    AuthService, CloudinaryClient, FeedService, GoTrueClient, IdentityProvider, MediaHost,
    MediaUrls, PostComposer, ProfileService, SessionRefresher, SessionStore,
};
use std::sync::Arc;

/// Shared application state. Screens are built from it on demand.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub sessions: SessionStore,
    pub auth: AuthService,
    pub store: Arc<dyn DataStore>,
    pub media: Arc<dyn MediaHost>,
    pub urls: MediaUrls,
    pub notifier: Arc<dyn Notifier>,
}

impl App {
    /// Wire the app to the hosted backends named in `config`.
    pub fn connect(config: Config, notifier: Arc<dyn Notifier>) -> Self {
        let sessions = SessionStore::new();
        let identity = Arc::new(GoTrueClient::new(
            &config.supabase_url,
            &config.supabase_anon_key,
        ));
        let store = Arc::new(PostgrestDb::new(
            &config.supabase_url,
            &config.supabase_anon_key,
            sessions.subscribe(),
        ));
        let media = Arc::new(CloudinaryClient::new(
            &config.cloudinary_api_url,
            &config.cloudinary_cloud_name,
            &config.cloudinary_upload_preset,
        ));
        tracing::info!(
            supabase = %config.supabase_url,
            cloud = %config.cloudinary_cloud_name,
            "Backends configured"
        );

        Self::with_backends(config, sessions, identity, store, media, notifier)
    }

    /// Wire the app to caller-supplied collaborators.
    pub fn with_backends(
        config: Config,
        sessions: SessionStore,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DataStore>,
        media: Arc<dyn MediaHost>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let urls = MediaUrls::new(&config.cloudinary_cloud_name);
        Self {
            auth: AuthService::new(identity, sessions.clone()),
            config,
            sessions,
            store,
            media,
            urls,
            notifier,
        }
    }

    pub fn gate(&self) -> AuthGate {
        AuthGate::new(&self.sessions)
    }

    /// Session refresher; drive it with lifecycle events.
    pub fn refresher(&self) -> SessionRefresher {
        SessionRefresher::new(self.auth.identity(), self.sessions.clone())
    }

    pub fn sign_in_screen(&self) -> SignInScreen {
        SignInScreen::new(self.auth.clone(), self.notifier.clone())
    }

    pub fn feed_screen(&self) -> FeedScreen {
        FeedScreen::new(
            FeedService::new(self.store.clone()),
            self.urls.clone(),
            self.notifier.clone(),
            self.config.feed_width,
        )
    }

    pub fn new_post_screen(&self) -> NewPostScreen {
        NewPostScreen::new(
            PostComposer::new(self.store.clone(), self.media.clone()),
            self.sessions.clone(),
            self.notifier.clone(),
        )
    }

    pub fn profile_screen(&self) -> ProfileScreen {
        ProfileScreen::new(
            ProfileService::new(self.store.clone(), self.media.clone()),
            FeedService::new(self.store.clone()),
            self.auth.clone(),
            self.urls.clone(),
            self.notifier.clone(),
        )
    }
}
