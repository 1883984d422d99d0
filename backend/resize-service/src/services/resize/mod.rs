//! Image variant generation
//!
//! This module provides the resize pipeline:
//! - Size calculator fitting each target box without distortion
//! - Image processor decoding once and rendering each target size
//! - Fetcher and publisher over an `ObjectStore`
//! - Service sequencing validate, fetch, render and publish

pub mod fetcher;
pub mod processor;
pub mod publisher;
pub mod service;
pub mod sizing;

pub use fetcher::{FetchedObject, ObjectFetcher};
pub use processor::{render_variants, ImageProcessor, RenderedImage, VariantRenderer};
pub use publisher::{destination_key, split_key, ObjectPublisher};
pub use service::{PipelineStage, PublishedVariant, ResizeFailure, ResizeReport, ResizeService};
pub use sizing::{scale_to_fit, TargetSize, TARGET_SIZES};
