use crate::error::Result;
use crate::event::SourceReference;
use bytes::Bytes;
use s3_utils::ObjectStore;
use tracing::debug;

/// Downloaded original
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

/// Reads the source object from storage; no retries
pub struct ObjectFetcher<S> {
    store: S,
}

impl<S: ObjectStore> ObjectFetcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn fetch(&self, source: &SourceReference) -> Result<FetchedObject> {
        let object = self.store.get_object(&source.bucket, &source.key).await?;

        debug!(
            source = %source,
            size = object.body.len(),
            content_type = ?object.content_type,
            "Fetched original"
        );

        Ok(FetchedObject {
            body: object.body,
            content_type: object.content_type,
        })
    }
}
