//! Application configuration loaded from environment variables.
//!
//! Everything here is public client configuration: the Supabase anon key is
//! meant to ship inside the app, and Cloudinary uploads use an unsigned preset.

use std::env;

const DEFAULT_CLOUDINARY_API_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_UPLOAD_PRESET: &str = "Default";
const DEFAULT_FEED_WIDTH: u32 = 512;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Supabase project URL (auth and REST live under it)
    pub supabase_url: String,
    /// Supabase anon key, sent as `apikey` on every request
    pub supabase_anon_key: String,
    /// Cloudinary cloud name
    pub cloudinary_cloud_name: String,
    /// Unsigned upload preset
    pub cloudinary_upload_preset: String,
    /// Cloudinary upload API base
    pub cloudinary_api_url: String,
    /// Thumbnail width for feed cards, in pixels
    pub feed_width: u32,
}

impl Config {
    /// Config for tests, pointing at nothing.
    pub fn test_default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test_anon_key".to_string(),
            cloudinary_cloud_name: "test-cloud".to_string(),
            cloudinary_upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
            cloudinary_api_url: DEFAULT_CLOUDINARY_API_URL.to_string(),
            feed_width: DEFAULT_FEED_WIDTH,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
            cloudinary_upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_PRESET.to_string()),
            cloudinary_api_url: env::var("CLOUDINARY_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_CLOUDINARY_API_URL.to_string()),
            feed_width: match env::var("FEED_WIDTH") {
                Ok(v) => v.parse().map_err(|_| ConfigError::Invalid("FEED_WIDTH"))?,
                Err(_) => DEFAULT_FEED_WIDTH,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
