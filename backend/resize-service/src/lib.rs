//! Resize Service
//!
//! Turns S3 object-created notifications into resized image variants
//! written to a separate bucket.

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod services;

// Public re-exports
pub use config::{Config, ResizeConfig};
pub use error::{ResizeError, Result};
pub use event::{S3Event, SourceReference};
pub use services::resize::ResizeService;
