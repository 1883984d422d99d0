/// Configuration management for the resize service
///
/// Loads configuration from environment variables with sensible defaults.
use crate::services::resize::sizing::{TargetSize, TARGET_SIZES};
use s3_utils::S3Config;

/// Bucket every variant is written to
pub const DEFAULT_DESTINATION_BUCKET: &str = "settlin";

/// JPEG quality used when re-encoding JPEG variants
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub resize: ResizeConfig,
    pub s3: S3Config,
    pub log_format: LogFormat,
}

#[derive(Clone, Debug)]
pub struct ResizeConfig {
    pub destination_bucket: String,
    pub jpeg_quality: u8,
    pub target_sizes: Vec<TargetSize>,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            destination_bucket: DEFAULT_DESTINATION_BUCKET.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            target_sizes: TARGET_SIZES.to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let destination_bucket = lookup("RESIZE_DESTINATION_BUCKET")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DESTINATION_BUCKET.to_string());

        let jpeg_quality = lookup("RESIZE_JPEG_QUALITY")
            .and_then(|v| v.trim().parse::<u8>().ok())
            .map(|q| q.clamp(1, 100))
            .unwrap_or(DEFAULT_JPEG_QUALITY);

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("text") | Some("pretty") => LogFormat::Text,
            _ => LogFormat::Json,
        };

        Config {
            resize: ResizeConfig {
                destination_bucket,
                jpeg_quality,
                target_sizes: TARGET_SIZES.to_vec(),
            },
            s3: S3Config::from_lookup(&lookup),
            log_format,
        }
    }
}
