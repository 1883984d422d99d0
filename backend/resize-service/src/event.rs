//! S3 object-created notifications and their validation
//!
//! Only the first record of a notification is acted on. Validation runs
//! before any storage call so a misrouted or unsupported upload costs no I/O.

use crate::error::{ResizeError, Result};
use image::ImageFormat;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3Record>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Record {
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Image types the pipeline can decode and re-encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
}

impl ImageType {
    /// Map a key extension to an image type; matching is case-sensitive
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "jpg" => Some(ImageType::Jpeg),
            "png" => Some(ImageType::Png),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            ImageType::Jpeg => ImageFormat::Jpeg,
            ImageType::Png => ImageFormat::Png,
        }
    }
}

/// Validated location of the uploaded original
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    pub bucket: String,
    /// Decoded key; may contain spaces and non-ASCII characters
    pub key: String,
    pub extension: String,
    pub image_type: ImageType,
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Decode an object key as it appears in S3 notifications
///
/// Spaces arrive as `+` and everything else percent-encoded.
/// A `%` must start a two-hex-digit escape; anything else is rejected.
pub fn decode_object_key(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return Err(ResizeError::InvalidEvent(format!(
                    "Object key {raw:?} has a malformed percent escape at byte {i}"
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ResizeError::InvalidEvent(format!("Object key {raw:?} is not valid UTF-8: {e}")))
}

/// Text after the last `.` of the key, if there is one
pub fn key_extension(key: &str) -> Option<&str> {
    key.rfind('.').map(|idx| &key[idx + 1..])
}

/// `bucket/key` of the first record, for diagnostics before validation
///
/// The key is shown decoded when it decodes and as received otherwise.
pub fn describe_source(event: &S3Event) -> Option<String> {
    event.records.first().map(|record| {
        let raw = &record.s3.object.key;
        let key = decode_object_key(raw).unwrap_or_else(|_| raw.clone());
        format!("{}/{}", record.s3.bucket.name, key)
    })
}

/// Turn the first record of a notification into a source reference
///
/// Fails without touching storage when the source bucket is the destination
/// bucket or when the key does not name a supported image.
pub fn validate_event(event: &S3Event, destination_bucket: &str) -> Result<SourceReference> {
    let record = event
        .records
        .first()
        .ok_or_else(|| ResizeError::InvalidEvent("Notification contains no records".to_string()))?;

    if event.records.len() > 1 {
        debug!(
            ignored = event.records.len() - 1,
            "Notification has extra records; only the first is processed"
        );
    }

    let bucket = record.s3.bucket.name.as_str();
    if bucket.is_empty() {
        return Err(ResizeError::InvalidEvent(
            "Record has an empty bucket name".to_string(),
        ));
    }
    if record.s3.object.key.is_empty() {
        return Err(ResizeError::InvalidEvent(
            "Record has an empty object key".to_string(),
        ));
    }

    let key = decode_object_key(&record.s3.object.key)?;

    if bucket == destination_bucket {
        return Err(ResizeError::Configuration(format!(
            "Source and destination buckets are the same: {bucket}"
        )));
    }

    let extension = key_extension(&key).ok_or_else(|| {
        ResizeError::UnsupportedFormat(format!("Could not determine the image type of {key:?}"))
    })?;

    let image_type = ImageType::from_extension(extension).ok_or_else(|| {
        ResizeError::UnsupportedFormat(format!("Unsupported image type: {extension:?}"))
    })?;

    Ok(SourceReference {
        bucket: bucket.to_string(),
        extension: extension.to_string(),
        key,
        image_type,
    })
}
