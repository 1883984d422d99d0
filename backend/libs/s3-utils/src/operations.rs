/// Object download and upload against S3
use crate::config::S3Config;
use crate::error::{Result, StorageError};
use crate::store::{ObjectStore, StoredObject};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct S3Operations {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Operations {
    pub fn new(client: Arc<Client>, config: S3Config) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ObjectStore for S3Operations {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        debug!(url = %self.config.object_url(bucket, key), "Downloading from S3");

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::from_sdk(e, bucket, key))?;

        let content_type = response.content_type().map(str::to_string);
        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::backend(bucket, key, format!("Failed to read body: {e}")))?
            .into_bytes();

        debug!(
            bucket = %bucket,
            key = %key,
            size = body.len(),
            content_type = ?content_type,
            "Downloaded from S3"
        );

        Ok(StoredObject { body, content_type })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<()> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::from_sdk(e, bucket, key))?;

        info!(bucket = %bucket, key = %key, size, "Uploaded to S3");
        Ok(())
    }
}
