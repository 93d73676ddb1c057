//! New post: pick an image, write a caption, share.

use crate::error::AppError;
use crate::screens::{surface, Notifier, Route};
use crate::services::{ComposerState, PostComposer, SessionStore};
use std::sync::Arc;

pub struct NewPostScreen {
    composer: PostComposer,
    sessions: SessionStore,
    notifier: Arc<dyn Notifier>,
}

impl NewPostScreen {
    pub fn new(composer: PostComposer, sessions: SessionStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            composer,
            sessions,
            notifier,
        }
    }

    pub fn composer(&self) -> &PostComposer {
        &self.composer
    }

    /// The picker returned `path`, or `None` when cancelled (keeps the current image).
    pub fn pick_image(&mut self, path: Option<String>) {
        if let Some(path) = path {
            self.composer.set_image(Some(path));
        }
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.composer.set_caption(caption);
    }

    /// Share the post. Returns the feed route on success, `None` to stay.
    pub async fn share(&mut self) -> Option<Route> {
        let session = self.sessions.current();
        let result = self.composer.submit(session.as_ref()).await;
        let outcome = match result {
            Ok(_) => Some(Route::Feed),
            Err(e) => {
                let context = match &e {
                    AppError::UploadFailed(_) => "Upload failed",
                    _ => "Failed to share post",
                };
                surface(self.notifier.as_ref(), context, &e, e.alert());
                None
            }
        };
        debug_assert!(matches!(
            self.composer.state(),
            ComposerState::Done | ComposerState::Failed
        ));
        self.composer.return_to_idle();
        outcome
    }
}
