// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in screen alerts and routing.

use feedgram::error::Alert;
use feedgram::screens::sign_in::VERIFY_EMAIL_MESSAGE;
use feedgram::screens::Route;

mod common;

#[tokio::test]
async fn test_sign_up_then_sign_in() {
    let t = common::create_test_app();
    let mut screen = t.app.sign_in_screen();
    screen.email = "ana@example.com".to_string();
    screen.password = "hunter2".to_string();

    assert_eq!(screen.sign_up().await, Route::Feed);
    assert!(!screen.is_loading());
    assert_eq!(t.app.gate().route(), Route::Feed);

    t.app.auth.sign_out().await;
    assert_eq!(screen.sign_in().await, Route::Feed);
    assert!(t.notifier.alerts().is_empty());
}

#[tokio::test]
async fn test_bad_password_alerts_verbatim() {
    let t = common::create_test_app();
    let mut screen = t.app.sign_in_screen();
    screen.email = "ana@example.com".to_string();
    screen.password = "nope".to_string();

    assert_eq!(screen.sign_in().await, Route::SignIn);
    assert_eq!(
        t.notifier.last(),
        Some(Alert::new("Invalid login credentials", ""))
    );
}

#[tokio::test]
async fn test_pending_verification_alert() {
    let t = common::create_test_app();
    t.identity.require_verification(true);
    let mut screen = t.app.sign_in_screen();
    screen.email = "bo@example.com".to_string();
    screen.password = "pw".to_string();

    assert_eq!(screen.sign_up().await, Route::SignIn);
    assert_eq!(t.notifier.last(), Some(Alert::new("", VERIFY_EMAIL_MESSAGE)));
}

#[tokio::test]
async fn test_empty_form_never_calls_identity() {
    let t = common::create_test_app();
    let mut screen = t.app.sign_in_screen();

    assert_eq!(screen.sign_in().await, Route::SignIn);
    assert_eq!(t.identity.calls(), 0);
    assert_eq!(t.notifier.alerts().len(), 1);
}
