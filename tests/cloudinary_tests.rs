// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Media upload against a local stand-in server.

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use feedgram::error::AppError;
use feedgram::services::{upload_image, CloudinaryClient};
use serde_json::{json, Value};

mod common;

async fn upload(
    Path(cloud): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let body = String::from_utf8_lossy(&body);
    let well_formed = content_type.starts_with("multipart/form-data")
        && body.contains("name=\"upload_preset\"\r\n\r\nDefault")
        && body.contains(&format!("name=\"cloud_name\"\r\n\r\n{}", cloud))
        && body.contains("filename=\"upload.jpg\"")
        && body.contains("fake jpeg body");
    if !well_formed {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"message": "Malformed upload"}})),
        );
    }

    match cloud.as_str() {
        "good" => (
            StatusCode::OK,
            Json(json!({
                "public_id": "abc123",
                "secure_url": "https://res.cloudinary.com/good/image/upload/v1/abc123.jpg",
                "format": "jpg"
            })),
        ),
        "unconfirmed" => (StatusCode::OK, Json(json!({"public_id": "abc123"}))),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"message": "Upload preset not found"}})),
        ),
    }
}

async fn host(cloud: &str) -> CloudinaryClient {
    let router = Router::new().route("/v1_1/{cloud}/image/upload", post(upload));
    let base = common::spawn_backend(router).await;
    CloudinaryClient::new(&format!("{}/v1_1", base), cloud, "Default")
}

#[tokio::test]
async fn test_upload_success() {
    let client = host("good").await;
    let (_file, path) = common::image_file();

    let uploaded = upload_image(&client, &format!("file://{}", path))
        .await
        .unwrap();

    assert_eq!(uploaded.public_id, "abc123");
    assert!(uploaded.secure_url.starts_with("https://"));
}

#[tokio::test]
async fn test_missing_secure_url_is_failure() {
    let client = host("unconfirmed").await;
    let (_file, path) = common::image_file();

    let err = upload_image(&client, &path).await.unwrap_err();
    assert!(matches!(err, AppError::UploadFailed(ref m) if m == "No secure_url returned"));
}

#[tokio::test]
async fn test_rejected_upload_carries_reason() {
    let client = host("nopreset").await;
    let (_file, path) = common::image_file();

    let err = upload_image(&client, &path).await.unwrap_err();
    match err {
        AppError::UploadFailed(message) => assert!(message.contains("Upload preset not found")),
        other => panic!("expected UploadFailed, got {other:?}"),
    }
}
