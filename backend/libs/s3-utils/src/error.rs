/// Storage error types
///
/// S3 failures are folded into three kinds so callers can tell a missing
/// object from a permissions problem without matching on SDK internals.
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Access denied to {bucket}/{key}: {message}")]
    AccessDenied {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Storage backend error for {bucket}/{key}: {message}")]
    Backend {
        bucket: String,
        key: String,
        message: String,
    },
}

impl StorageError {
    pub fn backend(bucket: &str, key: &str, message: impl Into<String>) -> Self {
        StorageError::Backend {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Classify an SDK failure by S3 error code, falling back to the HTTP status
    pub(crate) fn from_sdk<E>(err: SdkError<E, HttpResponse>, bucket: &str, key: &str) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    {
        let code = err
            .as_service_error()
            .and_then(|e| e.code())
            .map(str::to_string);
        let status = err.raw_response().map(|r| r.status().as_u16());
        let message = DisplayErrorContext(&err).to_string();

        match ErrorClass::of(code.as_deref(), status) {
            ErrorClass::NotFound => StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            ErrorClass::AccessDenied => StorageError::AccessDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message,
            },
            ErrorClass::Other => StorageError::backend(bucket, key, message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorClass {
    NotFound,
    AccessDenied,
    Other,
}

impl ErrorClass {
    fn of(code: Option<&str>, status: Option<u16>) -> Self {
        match code {
            Some("NoSuchKey") | Some("NoSuchBucket") | Some("NotFound") => ErrorClass::NotFound,
            Some("AccessDenied") | Some("Forbidden") | Some("AllAccessDisabled") => {
                ErrorClass::AccessDenied
            }
            _ => match status {
                Some(404) => ErrorClass::NotFound,
                Some(403) => ErrorClass::AccessDenied,
                _ => ErrorClass::Other,
            },
        }
    }
}
