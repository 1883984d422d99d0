/// Error types for the resize service
///
/// Every variant is terminal for the invocation that raised it; nothing
/// here is retried.
use s3_utils::StorageError;
use thiserror::Error;

/// Result type for resize-service operations
pub type Result<T> = std::result::Result<T, ResizeError>;

#[derive(Error, Debug)]
pub enum ResizeError {
    /// Source and destination buckets collide, or other static misconfiguration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Notification payload is missing or malformed
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Key has no extension, or the extension is not an allowed image type
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    Access(String),

    /// Any other storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Source bytes are not a valid image of the inferred type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Resizing or encoding a variant failed
    #[error("Render error: {0}")]
    Render(String),
}

impl ResizeError {
    /// Short machine-readable kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            ResizeError::Configuration(_) => "configuration",
            ResizeError::InvalidEvent(_) => "invalid_event",
            ResizeError::UnsupportedFormat(_) => "unsupported_format",
            ResizeError::NotFound(_) => "not_found",
            ResizeError::Access(_) => "access",
            ResizeError::Storage(_) => "storage",
            ResizeError::Decode(_) => "decode",
            ResizeError::Render(_) => "render",
        }
    }
}

impl From<StorageError> for ResizeError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ResizeError::NotFound(err.to_string()),
            StorageError::AccessDenied { .. } => ResizeError::Access(err.to_string()),
            StorageError::Backend { .. } => ResizeError::Storage(err.to_string()),
        }
    }
}
