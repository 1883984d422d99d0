/// Shared S3 utilities for the resize pipeline
///
/// Provides the `ObjectStore` seam, its S3 implementation, and the
/// configuration needed to build an S3 client from the ambient AWS chain.
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use std::sync::Arc;
use tracing::info;

pub mod config;
pub mod error;
pub mod operations;
pub mod store;

pub use config::S3Config;
pub use error::{Result, StorageError};
pub use operations::S3Operations;
pub use store::{ObjectStore, StoredObject};

/// Shared S3 client wrapper
#[derive(Clone)]
pub struct S3Client {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Client {
    /// Create new S3 client with configuration from environment
    pub async fn new() -> Self {
        Self::with_config(S3Config::from_env()).await
    }

    /// Create new S3 client with custom configuration
    pub async fn with_config(config: S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(config.path_style);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        let client = Client::from_conf(builder.build());

        info!(
            region = ?sdk_config.region(),
            endpoint = ?config.endpoint,
            path_style = config.path_style,
            "S3 client initialized"
        );

        Self {
            client: Arc::new(client),
            config,
        }
    }

    /// Object operations sharing this client
    pub fn operations(&self) -> S3Operations {
        S3Operations::new(self.client.clone(), self.config.clone())
    }
}
