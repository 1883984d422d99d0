use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Object body plus the content type the backend reported for it
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

/// Minimal read/write contract over a bucketed object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes and content type
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject>;

    /// Write an object, replacing any existing one at the same key
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<()>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for std::sync::Arc<T> {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        (**self).get_object(bucket, key).await
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<()> {
        (**self).put_object(bucket, key, body, content_type).await
    }
}
