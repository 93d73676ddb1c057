//! Media host upload results.

use serde::Deserialize;

/// Durable reference to an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedMedia {
    pub secure_url: String,
    pub public_id: String,
}
