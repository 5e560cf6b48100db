pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, RetryConfig};
pub use error::ScholarstreamError;
pub use types::*;
