//! Resize service - coordinates one invocation end to end
//!
//! This service handles the complete resize workflow:
//! 1. Validate the notification (no I/O)
//! 2. Download the original
//! 3. Render every target size
//! 4. Upload every variant to the destination bucket
//!
//! Each stage runs only after the previous one succeeded. A failure at any
//! stage ends the invocation; variants already uploaded stay where they are.

use super::fetcher::ObjectFetcher;
use super::processor::{render_variants, ImageProcessor, RenderedImage, VariantRenderer};
use super::publisher::ObjectPublisher;
use super::sizing::TargetSize;
use crate::config::ResizeConfig;
use crate::error::{ResizeError, Result};
use crate::event::{describe_source, validate_event, S3Event, SourceReference};
use s3_utils::ObjectStore;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Position of an invocation in the resize pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    Fetching,
    Rendering,
    Publishing,
    Done,
    Failed,
}

impl PipelineStage {
    /// Successor on the happy path
    pub fn next(self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Validating => Some(PipelineStage::Fetching),
            PipelineStage::Fetching => Some(PipelineStage::Rendering),
            PipelineStage::Rendering => Some(PipelineStage::Publishing),
            PipelineStage::Publishing => Some(PipelineStage::Done),
            PipelineStage::Done | PipelineStage::Failed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Validating => "validating",
            PipelineStage::Fetching => "fetching",
            PipelineStage::Rendering => "rendering",
            PipelineStage::Publishing => "publishing",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strictly forward-moving stage tracker
#[derive(Debug)]
struct Pipeline {
    stage: PipelineStage,
}

impl Pipeline {
    fn new() -> Self {
        Self {
            stage: PipelineStage::Validating,
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            debug!(from = %self.stage, to = %next, "Pipeline stage transition");
            self.stage = next;
        }
    }

    /// Enter `Failed`, returning the stage that failed
    fn fail(&mut self) -> PipelineStage {
        let failed_at = self.stage;
        self.stage = PipelineStage::Failed;
        failed_at
    }
}

/// One variant as written to the destination bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedVariant {
    pub key: String,
    pub suffix: &'static str,
    pub width: u32,
    pub height: u32,
    pub size: usize,
}

/// Successful invocation summary
#[derive(Debug, Clone)]
pub struct ResizeReport {
    pub source: SourceReference,
    pub destination_bucket: String,
    pub content_type: String,
    pub variants: Vec<PublishedVariant>,
    pub stage: PipelineStage,
}

/// Failed invocation: where it failed and why
#[derive(Error, Debug)]
#[error("Unable to resize {source_label} and upload to {destination_bucket} while {stage}: {error}")]
pub struct ResizeFailure {
    pub stage: PipelineStage,
    pub source_label: String,
    pub destination_bucket: String,
    #[source]
    pub error: ResizeError,
}

/// Resize service holding the storage client and renderer for all invocations
pub struct ResizeService {
    fetcher: ObjectFetcher<Arc<dyn ObjectStore>>,
    publisher: ObjectPublisher<Arc<dyn ObjectStore>>,
    renderer: Arc<dyn VariantRenderer>,
    config: ResizeConfig,
}

impl ResizeService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        renderer: Arc<dyn VariantRenderer>,
        config: ResizeConfig,
    ) -> Self {
        info!(
            destination_bucket = %config.destination_bucket,
            targets = config.target_sizes.len(),
            "Resize service initialized"
        );

        Self {
            fetcher: ObjectFetcher::new(store.clone()),
            publisher: ObjectPublisher::new(store),
            renderer,
            config,
        }
    }

    /// Service backed by the `image` crate renderer
    pub fn with_store(store: Arc<dyn ObjectStore>, config: ResizeConfig) -> Self {
        let renderer = Arc::new(ImageProcessor::new(config.jpeg_quality));
        Self::new(store, renderer, config)
    }

    /// Run one notification through validate, fetch, render and publish
    pub async fn handle(&self, event: &S3Event) -> std::result::Result<ResizeReport, ResizeFailure> {
        let mut pipeline = Pipeline::new();
        let mut source_label = describe_source(event);

        match self.run(event, &mut pipeline, &mut source_label).await {
            Ok(report) => {
                info!(
                    source = %report.source,
                    destination_bucket = %report.destination_bucket,
                    variants = report.variants.len(),
                    "Successfully resized and uploaded variants"
                );
                Ok(report)
            }
            Err(error) => {
                let failure = ResizeFailure {
                    stage: pipeline.fail(),
                    source_label: source_label.unwrap_or_else(|| "<unvalidated source>".to_string()),
                    destination_bucket: self.config.destination_bucket.clone(),
                    error,
                };
                error!(
                    source = %failure.source_label,
                    destination_bucket = %failure.destination_bucket,
                    stage = %failure.stage,
                    kind = failure.error.kind(),
                    error = %failure.error,
                    "Unable to resize image"
                );
                Err(failure)
            }
        }
    }

    async fn run(
        &self,
        event: &S3Event,
        pipeline: &mut Pipeline,
        source_label: &mut Option<String>,
    ) -> Result<ResizeReport> {
        let destination_bucket = &self.config.destination_bucket;

        let source = validate_event(event, destination_bucket)?;
        *source_label = Some(source.to_string());
        pipeline.advance();

        let original = self.fetcher.fetch(&source).await?;
        let content_type = original
            .content_type
            .clone()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| source.image_type.mime_type().to_string());
        pipeline.advance();

        let targets = &self.config.target_sizes;
        let rendered = render_variants(
            self.renderer.clone(),
            original.body,
            source.image_type,
            targets,
        )
        .await?;
        if rendered.len() != targets.len() {
            return Err(ResizeError::Render(format!(
                "Renderer produced {} variants for {} targets",
                rendered.len(),
                targets.len()
            )));
        }
        pipeline.advance();

        let keys = self
            .publisher
            .publish_all(
                destination_bucket,
                &source.key,
                targets
                    .iter()
                    .zip(rendered.iter())
                    .map(|(target, image)| (target.suffix, image.data.clone())),
                &content_type,
            )
            .await?;
        pipeline.advance();

        Ok(ResizeReport {
            variants: published_variants(targets, &rendered, keys),
            destination_bucket: destination_bucket.clone(),
            content_type,
            source,
            stage: pipeline.stage,
        })
    }
}

fn published_variants(
    targets: &[TargetSize],
    rendered: &[RenderedImage],
    keys: Vec<String>,
) -> Vec<PublishedVariant> {
    targets
        .iter()
        .zip(rendered)
        .zip(keys)
        .map(|((target, image), key)| PublishedVariant {
            key,
            suffix: target.suffix,
            width: image.width,
            height: image.height,
            size: image.data.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let mut stage = PipelineStage::Validating;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(
            seen,
            vec![
                PipelineStage::Validating,
                PipelineStage::Fetching,
                PipelineStage::Rendering,
                PipelineStage::Publishing,
                PipelineStage::Done,
            ]
        );
        assert_eq!(PipelineStage::Failed.next(), None);
    }

    #[test]
    fn test_fail_reports_stage_reached() {
        let mut pipeline = Pipeline::new();
        pipeline.advance();
        pipeline.advance();
        assert_eq!(pipeline.fail(), PipelineStage::Rendering);
        assert_eq!(pipeline.stage, PipelineStage::Failed);
    }

    #[test]
    fn test_failure_message_names_both_ends() {
        let failure = ResizeFailure {
            stage: PipelineStage::Fetching,
            source_label: "uploads/photos/a.png".to_string(),
            destination_bucket: "settlin".to_string(),
            error: ResizeError::NotFound("Object not found: uploads/photos/a.png".to_string()),
        };
        let message = failure.to_string();
        assert!(message.contains("uploads/photos/a.png"));
        assert!(message.contains("settlin"));
        assert!(message.contains("while fetching"));
    }
}
