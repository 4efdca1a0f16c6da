//! Bookscout: catalog ingestion with an async job subsystem
//!
//! This crate scrapes a paginated book catalog (listing pages plus per-item
//! detail pages), cleans and persists the records, and exposes a job manager
//! that runs crawls in the background while clients poll their status.

pub mod config;
pub mod jobs;
pub mod pipeline;
pub mod scrape;

use thiserror::Error;

/// Main error type for bookscout operations
#[derive(Debug, Error)]
pub enum BookscoutError {
    #[error(transparent)]
    Fetch(#[from] scrape::FetchError),

    #[error(transparent)]
    Extract(#[from] scrape::ExtractError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for bookscout operations
pub type Result<T> = std::result::Result<T, BookscoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use jobs::{CacheNotifier, JobError, JobManager, JobStatus};
pub use pipeline::{clean_records, generate_report, OutputFormat, Persister, Report};
pub use scrape::{PageFetcher, Record, ScrapeEngine};
