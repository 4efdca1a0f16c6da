//! Job lifecycle data model

use crate::pipeline::{OutputFormat, Report};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a job
///
/// Transitions are monotonic and one-directional:
/// Pending → Running → {Completed | Failed}. A job never re-enters an
/// earlier state after reaching a terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether the job has reached a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Trigger request parameters; every field is optional and defaults from config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobParams {
    /// Base URL to scrape
    pub url: Option<String>,

    /// Number of listing pages
    pub pages: Option<u32>,

    /// Output encodings
    pub format: Option<OutputFormat>,

    /// Output filename stem
    pub output: Option<String>,
}

/// Fully-resolved parameters a job runs with, echoed in status payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    pub url: String,
    pub pages: u32,
    pub format: OutputFormat,
    pub output: String,
}

/// Result payload, present only once a job completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    /// Number of clean records produced
    pub books_count: usize,

    /// Paths of the files written, empty for a zero-record run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// Batch summary, absent for a zero-record run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,

    /// Human-readable note, e.g. when no records were found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One tracked job as stored in the manager's table
#[derive(Debug, Clone)]
pub(crate) struct Job {
    pub id: String,
    pub seq: u64,
    pub status: JobStatus,
    pub spec: JobSpec,
    pub result: Option<JobResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            job_id: self.id.clone(),
            status: self.status,
            parameters: self.spec.clone(),
            results: self.result.clone(),
            error: self.error.clone(),
            created_at: self.created_at,
            finished_at: self.finished_at,
        }
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            job_id: self.id.clone(),
            status: self.status,
            url: self.spec.url.clone(),
            pages: self.spec.pages,
        }
    }
}

/// Point-in-time view of one job, as returned by `status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub status: JobStatus,
    pub parameters: JobSpec,

    /// Present only when status is Completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<JobResult>,

    /// Present only when status is Failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Abbreviated job view, as returned by `list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub status: JobStatus,
    pub url: String,
    pub pages: u32,
}
