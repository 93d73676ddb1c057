// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod composer;
pub mod feed;
pub mod media;
pub mod profile;
pub mod session;

pub use auth::{AuthService, Credentials, GoTrueClient, IdentityProvider, SignUpOutcome};
pub use composer::{ComposerState, PostComposer};
pub use feed::{FeedService, PostCard};
pub use media::{upload_image, CloudinaryClient, MediaHost, MediaUrls, Thumbnail};
pub use profile::{ProfileForm, ProfileService};
pub use session::{Lifecycle, RefreshState, SessionRefresher, SessionStore};
