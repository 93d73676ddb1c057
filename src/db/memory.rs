//! In-memory store for tests and offline runs.
//!
//! Joins posts to profiles on read like the hosted store does, and counts
//! every call so tests can assert that a flow never reached the store.

use crate::db::DataStore;
use crate::error::StoreError;
use crate::models::{Author, FeedPost, NewPost, Post, PostId, Profile};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    posts: Vec<Post>,
    profiles: BTreeMap<String, Profile>,
    next_post_id: PostId,
}

/// In-memory `DataStore`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    fail_writes: Mutex<Option<StoreError>>,
    fail_reads: Mutex<Option<StoreError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    /// Make every subsequent write fail with `error`.
    pub fn fail_writes_with(&self, error: StoreError) {
        *self
            .fail_writes
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    /// Make every subsequent read fail with `error`.
    pub fn fail_reads_with(&self, error: StoreError) {
        *self
            .fail_reads
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    /// Seed a profile row without counting a call.
    pub fn seed_profile(&self, profile: Profile) {
        self.lock().profiles.insert(profile.id.clone(), profile);
    }

    /// Seed a post row without counting a call.
    pub fn seed_post(&self, post: NewPost) -> Post {
        let mut tables = self.lock();
        insert(&mut tables, post)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), StoreError> {
        injected(&self.fail_writes)
    }

    fn check_read(&self) -> Result<(), StoreError> {
        injected(&self.fail_reads)
    }
}

fn injected(slot: &Mutex<Option<StoreError>>) -> Result<(), StoreError> {
    match slot.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

fn insert(tables: &mut Tables, post: NewPost) -> Post {
    tables.next_post_id += 1;
    let row = Post {
        id: tables.next_post_id,
        caption: post.caption,
        image: post.image,
        user_id: post.user_id,
    };
    tables.posts.push(row.clone());
    row
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select_posts(&self, author_id: Option<&str>) -> Result<Vec<FeedPost>, StoreError> {
        self.enter();
        self.check_read()?;
        let tables = self.lock();
        Ok(tables
            .posts
            .iter()
            .filter(|p| author_id.map_or(true, |id| p.user_id == id))
            .map(|p| FeedPost {
                id: p.id,
                caption: p.caption.clone(),
                image: p.image.clone(),
                user_id: p.user_id.clone(),
                user: tables.profiles.get(&p.user_id).map(|profile| Author {
                    id: profile.id.clone(),
                    username: profile.username.clone(),
                    avatar_url: profile.avatar_url.clone(),
                }),
            })
            .collect())
    }

    async fn insert_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        self.enter();
        self.check_write()?;
        if post.user_id.is_empty() {
            return Err(StoreError {
                message: "null value in column \"user_id\" violates not-null constraint"
                    .to_string(),
                code: Some("23502".to_string()),
                ..StoreError::default()
            });
        }
        Ok(insert(&mut self.lock(), post.clone()))
    }

    async fn select_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        self.enter();
        self.check_read()?;
        Ok(self.lock().profiles.get(id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StoreError> {
        self.enter();
        self.check_write()?;
        self.lock()
            .profiles
            .insert(profile.id.clone(), profile.clone());
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_join_and_filter() {
        let store = MemoryStore::new();
        store.seed_profile(Profile {
            id: "u1".to_string(),
            username: Some("ana".to_string()),
            avatar_url: None,
        });
        for (user, image) in [("u1", "a"), ("u2", "b"), ("u1", "c")] {
            store.seed_post(NewPost {
                caption: None,
                image: image.to_string(),
                user_id: user.to_string(),
            });
        }

        let all = store.select_posts(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[1].user.is_none());

        let mine = store.select_posts(Some("u1")).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p.user.is_some()));
        assert_eq!(store.calls(), 2);
    }
}
