//! Data store layer (Supabase PostgREST).

pub mod memory;
pub mod postgrest;

pub use memory::MemoryStore;
pub use postgrest::PostgrestDb;

use crate::error::StoreError;
use crate::models::{FeedPost, NewPost, Post, Profile};
use async_trait::async_trait;

/// Table names as constants.
pub mod tables {
    pub const POSTS: &str = "posts";
    pub const PROFILES: &str = "profiles";
}

/// Relational store holding profiles and posts.
///
/// Rows are validated into typed records at this boundary; a row that does
/// not decode is reported as a `StoreError`.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// All posts joined to their author, optionally filtered by author id.
    async fn select_posts(&self, author_id: Option<&str>) -> Result<Vec<FeedPost>, StoreError>;

    /// Insert one post and return the stored row.
    async fn insert_post(&self, post: &NewPost) -> Result<Post, StoreError>;

    /// Fetch a profile by primary key.
    async fn select_profile(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    /// Insert or replace a profile by primary key and return the stored row.
    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StoreError>;
}
