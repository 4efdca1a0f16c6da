//! Job subsystem: asynchronous crawl orchestration
//!
//! The `JobManager` accepts trigger requests, validates their parameters,
//! runs the crawl-and-pipeline work on background tasks, and answers
//! status/list queries concurrently with the running work.
//!
//! # Components
//!
//! - `JobManager`: owns the job table and the bounded worker pool
//! - `JobStatus` and friends: the job lifecycle data model
//! - `CacheNotifier`: injected hook telling the read side to reload

mod manager;
mod notify;
mod types;

pub use manager::JobManager;
pub use notify::{CacheNotifier, NoopNotifier, NotifyError};
pub use types::{JobParams, JobResult, JobSnapshot, JobSpec, JobStatus, JobSummary};

use thiserror::Error;

/// Errors returned by the job API surface
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Invalid {field} parameter: {message}")]
    InvalidParams {
        field: &'static str,
        message: String,
    },

    #[error("Job \"{0}\" does not exist")]
    NotFound(String),
}
