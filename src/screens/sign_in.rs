//! Email/password sign-in and sign-up.

use crate::error::{Alert, AppError};
use crate::screens::{surface, Notifier, Route};
use crate::services::{AuthService, Credentials, SignUpOutcome};
use std::sync::Arc;

pub const VERIFY_EMAIL_MESSAGE: &str = "Please check your inbox for email verification!";

pub struct SignInScreen {
    auth: AuthService,
    notifier: Arc<dyn Notifier>,
    pub email: String,
    pub password: String,
    loading: bool,
}

impl SignInScreen {
    pub fn new(auth: AuthService, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            auth,
            notifier,
            email: String::new(),
            password: String::new(),
            loading: false,
        }
    }

    /// True while a request is in flight; buttons are disabled.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }

    /// Returns the route to show next.
    pub async fn sign_in(&mut self) -> Route {
        self.loading = true;
        let result = self.auth.sign_in(&self.credentials()).await;
        self.loading = false;

        match result {
            Ok(_) => Route::Feed,
            Err(e) => {
                surface(self.notifier.as_ref(), "Sign-in failed", &e, message_alert(&e));
                Route::SignIn
            }
        }
    }

    /// Returns the route to show next.
    pub async fn sign_up(&mut self) -> Route {
        self.loading = true;
        let result = self.auth.sign_up(&self.credentials()).await;
        self.loading = false;

        match result {
            Ok(SignUpOutcome::SignedIn(_)) => Route::Feed,
            Ok(SignUpOutcome::PendingVerification) => {
                self.notifier.alert(Alert::new("", VERIFY_EMAIL_MESSAGE));
                Route::SignIn
            }
            Err(e) => {
                surface(self.notifier.as_ref(), "Sign-up failed", &e, message_alert(&e));
                Route::SignIn
            }
        }
    }
}

/// Auth errors are shown as a bare message with no body.
fn message_alert(e: &AppError) -> Alert {
    Alert::new(e.to_string(), "")
}
