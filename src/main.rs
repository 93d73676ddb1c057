// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedgram headless shell
//!
//! Signs in with credentials from the environment, loads the feed and logs
//! each post card. Useful for checking a backend setup end to end.

use feedgram::{
    config::Config,
    screens::{LogNotifier, Route},
    services::Lifecycle,
    App,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(supabase = %config.supabase_url, "Starting Feedgram");

    let app = App::connect(config, Arc::new(LogNotifier));
    let mut refresher = app.refresher();
    refresher.on_lifecycle(Lifecycle::Active);

    let mut sign_in = app.sign_in_screen();
    sign_in.email = std::env::var("FEEDGRAM_EMAIL").unwrap_or_default();
    sign_in.password = std::env::var("FEEDGRAM_PASSWORD").unwrap_or_default();
    if sign_in.sign_in().await != Route::Feed {
        anyhow::bail!("Sign-in failed; see log for details");
    }

    let mut feed = app.feed_screen();
    feed.mount().await;
    for card in feed.cards() {
        tracing::info!(
            id = card.id,
            username = %card.username,
            caption = %card.caption,
            image = %card.image_url,
            "Post"
        );
    }

    refresher.on_lifecycle(Lifecycle::Background);
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("feedgram=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
