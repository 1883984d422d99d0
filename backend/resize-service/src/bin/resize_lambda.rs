//! Resize Lambda - generates resized variants for every uploaded image
//!
//! Environment variables:
//! - RESIZE_DESTINATION_BUCKET: bucket variants are written to (default: "settlin")
//! - RESIZE_JPEG_QUALITY: JPEG quality 1-100 (default: 85)
//! - AWS_REGION / S3_ENDPOINT / S3_PATH_STYLE: S3 client overrides
//! - LOG_FORMAT: "json" (default) or "text"
//! - RUST_LOG: tracing filter directives

use lambda_runtime::{run, service_fn, Error};
use resize_service::config::{Config, LogFormat};
use resize_service::handler::function_handler;
use resize_service::ResizeService;
use s3_utils::S3Client;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("resize_lambda=info,resize_service=info,s3_utils=info")
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        // CloudWatch adds its own timestamps
        LogFormat::Json => builder.json().without_time().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    init_tracing(config.log_format);
    info!(
        destination_bucket = %config.resize.destination_bucket,
        jpeg_quality = config.resize.jpeg_quality,
        "Starting resize lambda"
    );

    let s3 = S3Client::with_config(config.s3.clone()).await;
    let service = ResizeService::with_store(Arc::new(s3.operations()), config.resize.clone());

    run(service_fn(|event| function_handler(event, &service))).await
}
