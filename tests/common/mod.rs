// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use feedgram::config::Config;
use feedgram::db::MemoryStore;
use feedgram::mock::{MemoryIdentity, MemoryMediaHost, RecordingNotifier};
use feedgram::services::SessionStore;
use feedgram::App;
use std::io::Write;
use std::sync::Arc;

/// App wired to in-memory backends, with handles for assertions.
#[allow(dead_code)]
pub struct TestApp {
    pub app: App,
    pub identity: Arc<MemoryIdentity>,
    pub store: Arc<MemoryStore>,
    pub media: Arc<MemoryMediaHost>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let identity = Arc::new(MemoryIdentity::new());
    let store = Arc::new(MemoryStore::new());
    let media = Arc::new(MemoryMediaHost::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let app = App::with_backends(
        Config::test_default(),
        SessionStore::new(),
        identity.clone(),
        store.clone(),
        media.clone(),
        notifier.clone(),
    );

    TestApp {
        app,
        identity,
        store,
        media,
        notifier,
    }
}

impl TestApp {
    /// Publish a session for `user_id` without going through sign-in.
    #[allow(dead_code)]
    pub fn sign_in_as(&self, user_id: &str) -> feedgram::models::Session {
        let session = self.identity.issue_session(user_id, 3600);
        self.app.sessions.set(Some(session.clone()));
        session
    }
}

/// Write a small image file and return it with its path.
#[allow(dead_code)]
pub fn image_file() -> (tempfile::NamedTempFile, String) {
    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    file.write_all(b"\xff\xd8\xff\xe0fake jpeg body").unwrap();
    let path = file.path().to_string_lossy().to_string();
    (file, path)
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_backend(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
