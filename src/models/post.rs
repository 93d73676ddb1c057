// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Post rows as stored and as read back with their author joined.

use serde::{Deserialize, Serialize};

/// Post primary key (identity column).
pub type PostId = i64;

/// Row in the `posts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub caption: Option<String>,
    /// Media host public id
    pub image: String,
    /// Author profile id
    pub user_id: String,
}

/// Insert payload for a new post. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    pub caption: Option<String>,
    pub image: String,
    pub user_id: String,
}

/// Author sub-object joined from `profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A post with its author, as returned by feed and profile queries.
///
/// `user` is `None` when the author has no profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: PostId,
    #[serde(default)]
    pub caption: Option<String>,
    pub image: String,
    pub user_id: String,
    #[serde(default)]
    pub user: Option<Author>,
}

impl FeedPost {
    /// Post columns plus the author join, in PostgREST select syntax.
    pub const SELECT: &'static str = "id,caption,image,user_id,user:profiles(id,username,avatar_url)";
}
