// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types and the alerts they surface as.

use serde::Deserialize;

/// Error body returned by the relational store.
///
/// PostgREST reports every failure with these four fields; all but the
/// message may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreError {
    /// Error with only a message (connectivity, decoding).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Log all four fields as structured data.
    pub fn log(&self, context: &str) {
        tracing::error!(
            error = %self.message,
            code = self.code.as_deref().unwrap_or(""),
            details = self.details.as_deref().unwrap_or(""),
            hint = self.hint.as_deref().unwrap_or(""),
            "{context}"
        );
    }
}

/// Application error type. Every variant is terminal for the current
/// interaction and is shown to the user; none is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("You must be logged in")]
    Unauthenticated,

    #[error("No image selected")]
    MissingImage,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Failed to save: {error}")]
    PersistFailed {
        error: StoreError,
        /// Media uploaded before the failing write, left on the host.
        orphaned_media: Option<String>,
    },

    #[error("Query failed: {0}")]
    QueryFailed(StoreError),

    #[error("{0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// A blocking notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl AppError {
    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Unauthenticated => "unauthenticated",
            AppError::MissingImage => "missing_image",
            AppError::UploadFailed(_) => "upload_failed",
            AppError::PersistFailed { .. } => "persist_failed",
            AppError::QueryFailed(_) => "query_failed",
            AppError::Auth(_) => "auth",
            AppError::Internal(_) => "internal",
        }
    }

    /// Alert carrying the error message verbatim.
    pub fn alert(&self) -> Alert {
        Alert::new("Error", self.to_string())
    }

    /// Log the error at the point it was caught.
    pub fn log(&self, context: &str) {
        match self {
            AppError::PersistFailed {
                error,
                orphaned_media,
            } => {
                error.log(context);
                if let Some(public_id) = orphaned_media {
                    tracing::warn!(public_id = %public_id, "Uploaded media left orphaned");
                }
            }
            AppError::QueryFailed(error) => error.log(context),
            other => tracing::error!(kind = other.kind(), error = %other, "{context}"),
        }
    }
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_decodes_postgrest_body() {
        let body = r#"{"code":"23503","details":"Key is not present in table \"profiles\".","hint":null,"message":"insert or update on table \"posts\" violates foreign key constraint"}"#;
        let err: StoreError = serde_json::from_str(body).unwrap();

        assert_eq!(err.code.as_deref(), Some("23503"));
        assert!(err.hint.is_none());
        assert!(err.to_string().contains("violates foreign key"));
    }

    #[test]
    fn test_alert_is_verbatim() {
        let err = AppError::Auth("Invalid login credentials".to_string());
        assert_eq!(err.alert(), Alert::new("Error", "Invalid login credentials"));
        assert_eq!(err.kind(), "auth");
    }

    #[test]
    fn test_persist_failed_message() {
        let err = AppError::PersistFailed {
            error: StoreError::message("connection reset"),
            orphaned_media: Some("abc123".to_string()),
        };
        assert_eq!(err.to_string(), "Failed to save: connection reset");
    }
}
