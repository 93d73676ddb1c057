// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Media host client: image upload and delivery URLs.
//!
//! Uploads are unsigned (preset-based) single-shot multipart POSTs.
//! Delivery URLs are built locally; building one never touches the network.

use crate::error::{AppError, Result};
use crate::models::UploadedMedia;
use async_trait::async_trait;
use serde::Deserialize;

/// File name sent with every upload; the host assigns the public id.
const UPLOAD_FILE_NAME: &str = "upload.jpg";

const DELIVERY_HOST: &str = "https://res.cloudinary.com";

/// Image bytes ready to send.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Media host collaborator.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Transfer the bytes and return the durable reference.
    async fn upload(&self, file: MediaFile) -> Result<UploadedMedia>;
}

/// Upload the local file at `reference` (a path or `file://` URI).
///
/// An empty reference fails before the host is contacted.
pub async fn upload_image(host: &dyn MediaHost, reference: &str) -> Result<UploadedMedia> {
    let reference = reference.trim();
    if reference.is_empty() {
        tracing::warn!("No image selected");
        return Err(AppError::InvalidInput("No image selected".to_string()));
    }

    let path = reference.strip_prefix("file://").unwrap_or(reference);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::InvalidInput(format!("Cannot read image {}: {}", path, e)))?;

    let uploaded = host
        .upload(MediaFile {
            bytes,
            file_name: UPLOAD_FILE_NAME.to_string(),
        })
        .await?;
    tracing::info!(public_id = %uploaded.public_id, "Upload success");
    Ok(uploaded)
}

/// Upload API response. Only a present `secure_url` confirms the upload.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

/// Cloudinary upload client.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    upload_url: String,
    cloud_name: String,
    upload_preset: String,
}

impl CloudinaryClient {
    /// Create a client for `{api_url}/{cloud_name}/image/upload`.
    pub fn new(api_url: &str, cloud_name: &str, upload_preset: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            upload_url: format!(
                "{}/{}/image/upload",
                api_url.trim_end_matches('/'),
                cloud_name
            ),
            cloud_name: cloud_name.to_string(),
            upload_preset: upload_preset.to_string(),
        }
    }
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    async fn upload(&self, file: MediaFile) -> Result<UploadedMedia> {
        let size = file.bytes.len();
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str("image/jpeg")
            .map_err(|e| AppError::Internal(e.into()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("cloud_name", self.cloud_name.clone());

        tracing::debug!(bytes = size, url = %self.upload_url, "Uploading image");
        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::UploadFailed(format!("Upload request failed: {}", e)))?;

        let status = response.status();
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::UploadFailed(format!("HTTP {}: unreadable response: {}", status, e)))?;

        if !status.is_success() {
            let reason = body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "no error message".to_string());
            tracing::error!(status = %status, reason = %reason, "Upload failed");
            return Err(AppError::UploadFailed(format!("HTTP {}: {}", status, reason)));
        }

        match (body.secure_url, body.public_id) {
            (Some(secure_url), Some(public_id)) => Ok(UploadedMedia {
                secure_url,
                public_id,
            }),
            _ => {
                tracing::error!("Upload response missing secure_url");
                Err(AppError::UploadFailed("No secure_url returned".to_string()))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Delivery URLs
// ─────────────────────────────────────────────────────────────────────────────

/// Thumbnail crop to apply at delivery time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Center the crop on a detected face.
    pub face: bool,
}

impl Thumbnail {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            face: false,
        }
    }

    pub fn focus_face(mut self) -> Self {
        self.face = true;
        self
    }

    /// Transformation component; qualifiers are kept in alphabetical order.
    fn component(&self) -> String {
        let mut parts = vec!["c_thumb".to_string()];
        if self.face {
            parts.push("g_face".to_string());
        }
        parts.push(format!("h_{}", self.height));
        parts.push(format!("w_{}", self.width));
        parts.join(",")
    }
}

/// Builds delivery URLs for a cloud.
#[derive(Debug, Clone)]
pub struct MediaUrls {
    cloud_name: String,
}

impl MediaUrls {
    pub fn new(cloud_name: &str) -> Self {
        Self {
            cloud_name: cloud_name.to_string(),
        }
    }

    /// Delivery URL for a public id or a remote URL.
    ///
    /// Remote URLs go through the `fetch` delivery type so transforms still
    /// apply to images the host does not store.
    pub fn url(&self, reference: &str, thumbnail: Option<Thumbnail>) -> String {
        let transform = thumbnail
            .map(|t| format!("{}/", t.component()))
            .unwrap_or_default();

        if is_remote(reference) {
            return format!(
                "{}/{}/image/fetch/{}{}",
                DELIVERY_HOST,
                self.cloud_name,
                transform,
                urlencoding::encode(reference)
            );
        }

        let version = if needs_version(reference) { "v1/" } else { "" };
        format!(
            "{}/{}/image/upload/{}{}{}",
            DELIVERY_HOST, self.cloud_name, transform, version, reference
        )
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("https://") || reference.starts_with("http://")
}

/// Foldered public ids need an explicit version so the folder is not read
/// as a transformation.
fn needs_version(public_id: &str) -> bool {
    if !public_id.contains('/') {
        return false;
    }
    let first = public_id.split('/').next().unwrap_or("");
    let explicit = first.len() > 1
        && first.starts_with('v')
        && first[1..].chars().all(|c| c.is_ascii_digit());
    !explicit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryMediaHost;

    #[tokio::test]
    async fn test_empty_reference_never_reaches_host() {
        let host = MemoryMediaHost::new();
        for reference in ["", "   "] {
            let err = upload_image(&host, reference).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
        assert_eq!(host.calls(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_invalid_input() {
        let host = MemoryMediaHost::new();
        let err = upload_image(&host, "file:///definitely/not/here.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(host.calls(), 0);
    }

    #[test]
    fn test_avatar_url() {
        let urls = MediaUrls::new("demo");
        let url = urls.url("sample", Some(Thumbnail::square(48).focus_face()));
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/c_thumb,g_face,h_48,w_48/sample"
        );
    }

    #[test]
    fn test_plain_and_foldered_ids() {
        let urls = MediaUrls::new("demo");
        assert_eq!(
            urls.url("sample", None),
            "https://res.cloudinary.com/demo/image/upload/sample"
        );
        assert_eq!(
            urls.url("posts/abc", Some(Thumbnail::square(200))),
            "https://res.cloudinary.com/demo/image/upload/c_thumb,h_200,w_200/v1/posts/abc"
        );
        assert_eq!(
            urls.url("v123/posts/abc", None),
            "https://res.cloudinary.com/demo/image/upload/v123/posts/abc"
        );
    }

    #[test]
    fn test_remote_reference_uses_fetch() {
        let urls = MediaUrls::new("demo");
        let url = urls.url(
            "https://via.placeholder.com/48",
            Some(Thumbnail::square(48).focus_face()),
        );
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/fetch/c_thumb,g_face,h_48,w_48/https%3A%2F%2Fvia.placeholder.com%2F48"
        );
    }
}
