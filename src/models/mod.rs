// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod media;
pub mod post;
pub mod profile;
pub mod session;

pub use media::UploadedMedia;
pub use post::{Author, FeedPost, NewPost, Post, PostId};
pub use profile::Profile;
pub use session::{Session, SessionUser};
