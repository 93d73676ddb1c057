//! Home feed.

use crate::error::Alert;
use crate::models::FeedPost;
use crate::screens::{surface, Notifier};
use crate::services::{FeedService, MediaUrls, PostCard};
use std::sync::Arc;

pub struct FeedScreen {
    feed: FeedService,
    urls: MediaUrls,
    notifier: Arc<dyn Notifier>,
    width: u32,
    posts: Vec<FeedPost>,
}

impl FeedScreen {
    /// `width` is the card width; images are cropped to a square of it.
    pub fn new(feed: FeedService, urls: MediaUrls, notifier: Arc<dyn Notifier>, width: u32) -> Self {
        Self {
            feed,
            urls,
            notifier,
            width,
            posts: Vec::new(),
        }
    }

    /// Fetch the whole feed. On failure the previous posts stay.
    pub async fn mount(&mut self) {
        match self.feed.load_feed().await {
            Ok(posts) => self.posts = posts,
            Err(e) => surface(
                self.notifier.as_ref(),
                "Error fetching posts",
                &e,
                Alert::new("Error", "Failed to fetch posts. Please try again later."),
            ),
        }
    }

    pub fn posts(&self) -> &[FeedPost] {
        &self.posts
    }

    pub fn cards(&self) -> Vec<PostCard> {
        self.posts
            .iter()
            .map(|p| PostCard::new(p, &self.urls, self.width))
            .collect()
    }
}
