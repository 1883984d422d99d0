//! Test fixtures for resize pipeline integration tests
//! Provides an in-memory object store, fault-injecting renderers and image builders
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use resize_service::event::{ImageType, S3Event};
use resize_service::services::resize::{
    ImageProcessor, RenderedImage, TargetSize, VariantRenderer,
};
use resize_service::{ResizeConfig, ResizeError};
use s3_utils::{ObjectStore, StorageError, StoredObject};
use serde_json::json;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const SOURCE_BUCKET: &str = "uploads";
pub const DESTINATION_BUCKET: &str = "settlin";

// ============================================
// Events
// ============================================

/// Notification for one object, with the key exactly as S3 encodes it
pub fn s3_event(bucket: &str, raw_key: &str) -> S3Event {
    serde_json::from_value(json!({
        "Records": [{
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": { "name": bucket, "arn": format!("arn:aws:s3:::{bucket}") },
                "object": { "key": raw_key, "size": 2048, "eTag": "0123456789abcdef" }
            }
        }]
    }))
    .expect("valid S3 notification")
}

pub fn resize_config() -> ResizeConfig {
    ResizeConfig {
        destination_bucket: DESTINATION_BUCKET.to_string(),
        ..ResizeConfig::default()
    }
}

// ============================================
// Images
// ============================================

pub fn png_bytes(width: u32, height: u32) -> Bytes {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    encode(DynamicImage::ImageRgba8(img), ImageOutputFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Bytes {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, 64, (y % 256) as u8]));
    encode(DynamicImage::ImageRgb8(img), ImageOutputFormat::Jpeg(90))
}

fn encode(img: DynamicImage, format: ImageOutputFormat) -> Bytes {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("encode test image");
    Bytes::from(buf)
}

/// Decoded dimensions of an encoded variant
pub fn dimensions_of(data: &[u8]) -> (u32, u32) {
    use image::GenericImageView;
    image::load_from_memory(data)
        .expect("variant decodes")
        .dimensions()
}

// ============================================
// In-memory object store
// ============================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get { bucket: String, key: String },
    Put { bucket: String, key: String, content_type: String },
}

#[derive(Debug, Clone, Copy)]
pub enum Fault {
    NotFound,
    AccessDenied,
    Backend,
}

impl Fault {
    fn into_error(self, bucket: &str, key: &str) -> StorageError {
        match self {
            Fault::NotFound => StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            Fault::AccessDenied => StorageError::AccessDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "AccessDenied".to_string(),
            },
            Fault::Backend => StorageError::backend(bucket, key, "connection reset"),
        }
    }
}

/// Object store that records every call and can fail on demand
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    calls: Mutex<Vec<StoreCall>>,
    get_fault: Mutex<Option<Fault>>,
    /// Zero-based index of the put that fails
    put_fault: Mutex<Option<(usize, Fault)>>,
    puts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, bucket: &str, key: &str, body: Bytes, content_type: Option<&str>) -> Self {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.map(str::to_string),
            },
        );
        self
    }

    pub fn failing_get(self, fault: Fault) -> Self {
        *self.get_fault.lock().unwrap() = Some(fault);
        self
    }

    pub fn failing_put(self, index: usize, fault: Fault) -> Self {
        *self.put_fault.lock().unwrap() = Some((index, fault));
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn put_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Put { key, .. } => Some(key),
                StoreCall::Get { .. } => None,
            })
            .collect()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys_in(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> s3_utils::Result<StoredObject> {
        self.calls.lock().unwrap().push(StoreCall::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if let Some(fault) = *self.get_fault.lock().unwrap() {
            return Err(fault.into_error(bucket, key));
        }

        self.object(bucket, key)
            .ok_or_else(|| Fault::NotFound.into_error(bucket, key))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> s3_utils::Result<()> {
        self.calls.lock().unwrap().push(StoreCall::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
        });

        let index = self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some((fail_at, fault)) = *self.put_fault.lock().unwrap() {
            if index == fail_at {
                return Err(fault.into_error(bucket, key));
            }
        }

        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }
}

// ============================================
// Renderers
// ============================================

/// Real renderer that fails the render with the given zero-based index
pub struct FailingRenderer {
    inner: ImageProcessor,
    fail_at: usize,
    renders: AtomicUsize,
}

impl FailingRenderer {
    pub fn new(fail_at: usize) -> Self {
        Self {
            inner: ImageProcessor::with_defaults(),
            fail_at,
            renders: AtomicUsize::new(0),
        }
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl VariantRenderer for FailingRenderer {
    fn decode(&self, data: &[u8], image_type: ImageType) -> resize_service::Result<DynamicImage> {
        self.inner.decode(data, image_type)
    }

    fn render(
        &self,
        source: &DynamicImage,
        target: &TargetSize,
        image_type: ImageType,
    ) -> resize_service::Result<RenderedImage> {
        let index = self.renders.fetch_add(1, Ordering::SeqCst);
        if index == self.fail_at {
            return Err(ResizeError::Render(format!(
                "injected failure for {}",
                target.suffix
            )));
        }
        self.inner.render(source, target, image_type)
    }
}
