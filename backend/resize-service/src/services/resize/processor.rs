//! Image processor - decodes an original once and renders each target size
//!
//! Decoding and every resize run on the blocking pool. Variants are produced
//! one at a time in target order and the first failure aborts the rest.

use super::sizing::{scale_to_fit, TargetSize};
use crate::config::DEFAULT_JPEG_QUALITY;
use crate::error::{ResizeError, Result};
use crate::event::ImageType;
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// One resized rendition, encoded in the source's format
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}

/// Decode/resize seam used by the resize service
pub trait VariantRenderer: Send + Sync {
    /// Decode the original using the format implied by its key
    fn decode(&self, data: &[u8], image_type: ImageType) -> Result<DynamicImage>;

    /// Resize the decoded original into one target box and encode it
    fn render(
        &self,
        source: &DynamicImage,
        target: &TargetSize,
        image_type: ImageType,
    ) -> Result<RenderedImage>;
}

/// `image`-crate backed renderer
#[derive(Clone, Debug)]
pub struct ImageProcessor {
    jpeg_quality: u8,
}

impl ImageProcessor {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }

    fn encode(&self, img: &DynamicImage, image_type: ImageType) -> Result<Bytes> {
        let mut buf = Vec::new();
        let mut cursor = Cursor::new(&mut buf);

        let written = match image_type {
            // JPEG has no alpha channel
            ImageType::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
                .write_to(&mut cursor, ImageOutputFormat::Jpeg(self.jpeg_quality)),
            ImageType::Png => img.write_to(&mut cursor, ImageOutputFormat::Png),
        };
        written.map_err(|e| {
            ResizeError::Render(format!("Failed to encode {:?}: {e}", image_type))
        })?;

        Ok(Bytes::from(buf))
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl VariantRenderer for ImageProcessor {
    fn decode(&self, data: &[u8], image_type: ImageType) -> Result<DynamicImage> {
        let img = image::load_from_memory_with_format(data, image_type.format())
            .map_err(|e| ResizeError::Decode(format!("Failed to decode {:?}: {e}", image_type)))?;

        let (width, height) = img.dimensions();
        debug!(width, height, size = data.len(), "Decoded original image");
        Ok(img)
    }

    fn render(
        &self,
        source: &DynamicImage,
        target: &TargetSize,
        image_type: ImageType,
    ) -> Result<RenderedImage> {
        let (orig_w, orig_h) = source.dimensions();
        let (width, height) = scale_to_fit(orig_w, orig_h, target.width, target.height)?;

        let resized = source.resize_exact(width, height, FilterType::Triangle);
        let data = self.encode(&resized, image_type)?;

        debug!(
            suffix = target.suffix,
            width,
            height,
            size = data.len(),
            "Variant rendered"
        );

        Ok(RenderedImage {
            data,
            width,
            height,
        })
    }
}

/// Decode `data` once, then render every target in order
///
/// Each step is its own blocking task; the first error is returned and no
/// further targets are rendered.
pub async fn render_variants<R>(
    renderer: Arc<R>,
    data: Bytes,
    image_type: ImageType,
    targets: &[TargetSize],
) -> Result<Vec<RenderedImage>>
where
    R: VariantRenderer + ?Sized + 'static,
{
    let decoder = renderer.clone();
    let source = tokio::task::spawn_blocking(move || decoder.decode(&data, image_type))
        .await
        .map_err(|e| ResizeError::Decode(format!("Decode task panicked: {e}")))??;
    let source = Arc::new(source);

    let mut rendered = Vec::with_capacity(targets.len());
    for target in targets.iter().copied() {
        let renderer = renderer.clone();
        let source = source.clone();
        let variant =
            tokio::task::spawn_blocking(move || renderer.render(&source, &target, image_type))
                .await
                .map_err(|e| ResizeError::Render(format!("Render task panicked: {e}")))??;
        rendered.push(variant);
    }

    Ok(rendered)
}
