//! Writes rendered variants next to the original's directory
//!
//! `photos/img.png` rendered for suffix `-200` lands at `photos-200/img.png`.

use crate::error::Result;
use bytes::Bytes;
use s3_utils::ObjectStore;
use tracing::info;

/// Split a key into its directory portion and base name, `dirname`-style
///
/// A key without `/` lives in `.`; a key directly under the root lives in `/`.
pub fn split_key(key: &str) -> (&str, &str) {
    match key.rfind('/') {
        None => (".", key),
        Some(0) => ("/", &key[1..]),
        Some(idx) => (&key[..idx], &key[idx + 1..]),
    }
}

/// Destination key for one variant of `source_key`
pub fn destination_key(source_key: &str, suffix: &str) -> String {
    let (dir, base) = split_key(source_key);
    format!("{dir}{suffix}/{base}")
}

pub struct ObjectPublisher<S> {
    store: S,
}

impl<S: ObjectStore> ObjectPublisher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Write one variant of `source_key` and return the key it was stored under
    pub async fn publish(
        &self,
        bucket: &str,
        source_key: &str,
        suffix: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String> {
        let key = destination_key(source_key, suffix);
        let size = body.len();

        self.store
            .put_object(bucket, &key, body, content_type)
            .await?;

        info!(bucket = %bucket, key = %key, size, content_type = %content_type, "Variant published");
        Ok(key)
    }

    /// Write every `(suffix, body)` pair in order, stopping at the first failure
    ///
    /// Variants written before a failure are left in place.
    pub async fn publish_all<I>(
        &self,
        bucket: &str,
        source_key: &str,
        variants: I,
        content_type: &str,
    ) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = (&'static str, Bytes)>,
    {
        let mut written = Vec::new();
        for (suffix, body) in variants {
            let key = self
                .publish(bucket, source_key, suffix, body, content_type)
                .await?;
            written.push(key);
        }
        Ok(written)
    }
}
