/// S3 connection settings shared by every bucket the resizer touches
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region override; `None` defers to the ambient AWS config chain
    pub region: Option<String>,
    /// Custom endpoint (MinIO, LocalStack, ...)
    pub endpoint: Option<String>,
    /// Whether to use path-style URLs (false = virtual-hosted-style)
    pub path_style: bool,
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            region: lookup("AWS_REGION").filter(|v| !v.trim().is_empty()),
            endpoint: lookup("S3_ENDPOINT").filter(|v| !v.trim().is_empty()),
            path_style: lookup("S3_PATH_STYLE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Build the S3 object URL for diagnostics
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        match (&self.endpoint, self.path_style) {
            (Some(endpoint), _) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
            }
            (None, true) => format!("https://s3.amazonaws.com/{}/{}", bucket, key),
            (None, false) => format!("https://{}.s3.amazonaws.com/{}", bucket, key),
        }
    }
}
