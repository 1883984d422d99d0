//! Lambda entry point for object-created notifications

use crate::event::S3Event;
use crate::services::resize::{ResizeReport, ResizeService};
use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use tracing::debug;

/// Payload returned to the invoker on success
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InvocationResponse {
    pub message: String,
    pub source: String,
    pub destination_bucket: String,
    pub variants: Vec<String>,
}

impl From<ResizeReport> for InvocationResponse {
    fn from(report: ResizeReport) -> Self {
        Self {
            message: format!(
                "Successfully resized {} and uploaded to {}",
                report.source, report.destination_bucket
            ),
            source: report.source.to_string(),
            destination_bucket: report.destination_bucket,
            variants: report.variants.into_iter().map(|v| v.key).collect(),
        }
    }
}

/// Handle one invocation; failures surface as the invocation's error message
pub async fn function_handler(
    event: LambdaEvent<S3Event>,
    service: &ResizeService,
) -> Result<InvocationResponse, Error> {
    let (payload, context) = event.into_parts();
    debug!(
        request_id = %context.request_id,
        records = payload.records.len(),
        event = ?payload,
        "Reading options from event"
    );

    let report = service.handle(&payload).await?;
    Ok(report.into())
}
