//! Job manager: trigger, track, and query crawl jobs
//!
//! One background task runs per triggered job, drawn from a bounded pool.
//! The job table is owned here exclusively, behind a mutex shared by the
//! triggering call (writer), each worker (writer of its own entry), and
//! status/list calls (readers), so a read never observes a torn record.

use crate::config::Config;
use crate::jobs::notify::{CacheNotifier, NoopNotifier};
use crate::jobs::types::{Job, JobParams, JobResult, JobSnapshot, JobSpec, JobStatus, JobSummary};
use crate::jobs::JobError;
use crate::pipeline::{clean_records, generate_report, Persister};
use crate::scrape::ScrapeEngine;
use crate::BookscoutError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Process-lifetime table of every job ever triggered
///
/// Jobs are never deleted; the table grows for the process lifetime, which
/// is acceptable under the documented no-persistence non-goal.
struct JobTable {
    jobs: HashMap<String, Job>,
    counter: u64,
}

struct Inner {
    config: Config,
    table: Mutex<JobTable>,
    permits: Arc<Semaphore>,
    notifier: Arc<dyn CacheNotifier>,
}

/// Accepts trigger requests and tracks job lifecycles
///
/// Cheap to clone; clones share the same job table and worker pool.
#[derive(Clone)]
pub struct JobManager {
    inner: Arc<Inner>,
}

impl JobManager {
    /// Creates a manager with no read-side cache to notify
    pub fn new(config: Config) -> Self {
        Self::with_notifier(config, Arc::new(NoopNotifier))
    }

    /// Creates a manager that signals the given notifier after completed runs
    pub fn with_notifier(config: Config, notifier: Arc<dyn CacheNotifier>) -> Self {
        let permits = Arc::new(Semaphore::new(config.jobs.max_concurrent as usize));
        Self {
            inner: Arc::new(Inner {
                config,
                table: Mutex::new(JobTable {
                    jobs: HashMap::new(),
                    counter: 0,
                }),
                permits,
                notifier,
            }),
        }
    }

    /// Triggers a new crawl job
    ///
    /// Validates the parameters synchronously; a validation failure creates
    /// no job. On success the job is stored as Pending, its worker is
    /// spawned, and the new job id is returned immediately without waiting
    /// for any crawling.
    ///
    /// # Errors
    ///
    /// `JobError::InvalidParams` when `pages` is outside [1, max-pages] or
    /// the output stem is unusable.
    pub fn trigger(&self, params: JobParams) -> Result<String, JobError> {
        let spec = self.resolve(params)?;

        let id = {
            let mut table = self.inner.table.lock().unwrap();
            table.counter += 1;
            let seq = table.counter;
            let id = format!("job_{}", seq);
            table.jobs.insert(
                id.clone(),
                Job {
                    id: id.clone(),
                    seq,
                    status: JobStatus::Pending,
                    spec: spec.clone(),
                    result: None,
                    error: None,
                    created_at: Utc::now(),
                    finished_at: None,
                },
            );
            id
        };

        tracing::info!("Scraping job {} started ({} pages)", id, spec.pages);
        tokio::spawn(run_job(self.inner.clone(), id.clone(), spec));

        Ok(id)
    }

    /// Returns the current snapshot of a job, never blocking on completion
    pub fn status(&self, job_id: &str) -> Result<JobSnapshot, JobError> {
        let table = self.inner.table.lock().unwrap();
        table
            .jobs
            .get(job_id)
            .map(Job::snapshot)
            .ok_or_else(|| JobError::NotFound(job_id.to_string()))
    }

    /// Returns summaries of all known jobs in creation order
    pub fn list(&self) -> Vec<JobSummary> {
        let table = self.inner.table.lock().unwrap();
        let mut jobs: Vec<&Job> = table.jobs.values().collect();
        jobs.sort_by_key(|job| job.seq);
        jobs.iter().map(|job| job.summary()).collect()
    }

    /// Number of jobs ever triggered
    pub fn job_count(&self) -> usize {
        self.inner.table.lock().unwrap().jobs.len()
    }

    /// Resolves optional trigger parameters against config defaults
    fn resolve(&self, params: JobParams) -> Result<JobSpec, JobError> {
        let scraper = &self.inner.config.scraper;
        let output = &self.inner.config.output;

        let pages = params.pages.unwrap_or(scraper.default_pages);
        if pages < 1 || pages > scraper.max_pages {
            return Err(JobError::InvalidParams {
                field: "pages",
                message: format!(
                    "Pages must be an integer between 1 and {}",
                    scraper.max_pages
                ),
            });
        }

        let name = params.output.unwrap_or_else(|| output.default_name.clone());
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(JobError::InvalidParams {
                field: "output",
                message: "Output name must be a plain filename stem".to_string(),
            });
        }

        Ok(JobSpec {
            url: params.url.unwrap_or_else(|| scraper.base_url.clone()),
            pages,
            format: params.format.unwrap_or(crate::pipeline::OutputFormat::Both),
            output: name,
        })
    }
}

/// Background worker for one job
async fn run_job(inner: Arc<Inner>, id: String, spec: JobSpec) {
    // Bounded worker pool: the job stays Pending until a permit frees up
    let Ok(_permit) = inner.permits.clone().acquire_owned().await else {
        // Only possible if the semaphore is closed, which never happens
        return;
    };

    set_running(&inner, &id);
    tracing::info!("Starting scraping job {}", id);

    // The work runs as its own task so that a panic surfaces here as a
    // JoinError instead of leaving the job stuck at Running
    let config = inner.config.clone();
    let worker = tokio::spawn(async move { execute(&config, &spec).await });
    settle(&inner, &id, worker.await);
}

/// Records the worker outcome in the job table
fn settle(
    inner: &Inner,
    id: &str,
    outcome: Result<Result<JobResult, BookscoutError>, tokio::task::JoinError>,
) {
    match outcome {
        Ok(Ok(result)) => {
            let had_records = result.books_count > 0;
            complete(inner, id, result);
            tracing::info!("Scraping job {} completed successfully", id);

            // Best effort: the read side reloads either way on its next
            // mtime poll, so a notification failure is only logged
            if had_records {
                if let Err(e) = inner.notifier.invalidate() {
                    tracing::warn!("Could not force immediate reload: {}", e);
                }
            }
        }
        Ok(Err(e)) => {
            tracing::error!("Scraping job {} failed: {}", id, e);
            fail(inner, id, e.to_string());
        }
        Err(e) => {
            tracing::error!("Scraping job {} worker panicked: {}", id, e);
            fail(inner, id, format!("worker panicked: {}", e));
        }
    }
}

/// Runs the crawl-and-pipeline work for one job
async fn execute(config: &Config, spec: &JobSpec) -> Result<JobResult, BookscoutError> {
    // The engine (and its HTTP session) lives exactly as long as this call
    let engine = ScrapeEngine::new(config, &spec.url)?;
    let records = engine.crawl(spec.pages, true).await;
    drop(engine);

    if records.is_empty() {
        return Ok(JobResult {
            books_count: 0,
            files: Vec::new(),
            report: None,
            message: Some("No books found".to_string()),
        });
    }

    let cleaned = clean_records(records);
    let persister = Persister::new(&config.output.directory);
    let paths = persister.persist(&cleaned, &spec.output, spec.format)?;
    let report = generate_report(&cleaned);

    Ok(JobResult {
        books_count: cleaned.len(),
        files: paths
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        report,
        message: None,
    })
}

fn set_running(inner: &Inner, id: &str) {
    let mut table = inner.table.lock().unwrap();
    if let Some(job) = table.jobs.get_mut(id) {
        job.status = JobStatus::Running;
    }
}

fn complete(inner: &Inner, id: &str, result: JobResult) {
    let mut table = inner.table.lock().unwrap();
    if let Some(job) = table.jobs.get_mut(id) {
        job.status = JobStatus::Completed;
        job.result = Some(result);
        job.finished_at = Some(Utc::now());
    }
}

fn fail(inner: &Inner, id: &str, error: String) {
    let mut table = inner.table.lock().unwrap();
    if let Some(job) = table.jobs.get_mut(id) {
        job.status = JobStatus::Failed;
        job.error = Some(error);
        job.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_manager() -> JobManager {
        let mut config = Config::default();
        config.scraper.delay_ms = 0;
        config.http.timeout_secs = 5;
        config.http.connect_timeout_secs = 1;
        // An unreachable origin: crawls finish quickly with zero records
        config.scraper.base_url = "http://127.0.0.1:1".to_string();
        JobManager::new(config)
    }

    async fn wait_terminal(manager: &JobManager, id: &str) -> JobSnapshot {
        for _ in 0..500 {
            let snapshot = manager.status(id).unwrap();
            if snapshot.status.is_terminal() {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {} never reached a terminal state", id);
    }

    #[tokio::test]
    async fn test_trigger_returns_id_immediately() {
        let manager = test_manager();
        let id = manager.trigger(JobParams::default()).unwrap();
        assert_eq!(id, "job_1");

        // Straight after triggering, the job is Pending or Running
        let snapshot = manager.status(&id).unwrap();
        assert!(matches!(
            snapshot.status,
            JobStatus::Pending | JobStatus::Running
        ));
        assert!(snapshot.results.is_none());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_job_ids_are_monotonic() {
        let manager = test_manager();
        let a = manager.trigger(JobParams::default()).unwrap();
        let b = manager.trigger(JobParams::default()).unwrap();
        assert_eq!(a, "job_1");
        assert_eq!(b, "job_2");
    }

    #[tokio::test]
    async fn test_invalid_pages_rejected_without_creating_job() {
        let manager = test_manager();

        for pages in [0u32, 51, 100] {
            let result = manager.trigger(JobParams {
                pages: Some(pages),
                ..Default::default()
            });
            assert!(matches!(
                result,
                Err(JobError::InvalidParams { field: "pages", .. })
            ));
        }

        assert_eq!(manager.job_count(), 0);
        assert!(manager.list().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_output_name_rejected() {
        let manager = test_manager();
        let result = manager.trigger(JobParams {
            output: Some("../escape".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(JobError::InvalidParams { field: "output", .. })
        ));
        assert_eq!(manager.job_count(), 0);
    }

    #[tokio::test]
    async fn test_status_unknown_job() {
        let manager = test_manager();
        let result = manager.status("job_999");
        assert!(matches!(result, Err(JobError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unreachable_origin_completes_with_zero_records() {
        let manager = test_manager();
        let id = manager.trigger(JobParams::default()).unwrap();

        let snapshot = wait_terminal(&manager, &id).await;
        assert_eq!(snapshot.status, JobStatus::Completed);
        let results = snapshot.results.unwrap();
        assert_eq!(results.books_count, 0);
        assert!(results.files.is_empty());
        assert_eq!(results.message.as_deref(), Some("No books found"));
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let manager = test_manager();
        for _ in 0..3 {
            manager.trigger(JobParams::default()).unwrap();
        }

        let jobs = manager.list();
        let ids: Vec<&str> = jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, vec!["job_1", "job_2", "job_3"]);
    }

    #[tokio::test]
    async fn test_worker_panic_marks_job_failed() {
        let manager = test_manager();

        // Hold every permit so the real worker stays parked at Pending
        let permits = manager.inner.permits.clone();
        let _held = permits
            .acquire_many_owned(manager.inner.config.jobs.max_concurrent)
            .await
            .unwrap();
        let id = manager.trigger(JobParams::default()).unwrap();

        let join_err = tokio::spawn(async {
            panic!("boom");
        })
            .await
            .expect_err("task should have panicked");
        settle(&manager.inner, &id, Err(join_err));

        let snapshot = manager.status(&id).unwrap();
        assert_eq!(snapshot.status, JobStatus::Failed);
        assert!(snapshot.error.unwrap().contains("panicked"));
        assert!(snapshot.results.is_none());
    }

    #[tokio::test]
    async fn test_spec_resolution_applies_defaults() {
        let manager = test_manager();
        let id = manager.trigger(JobParams::default()).unwrap();

        let snapshot = manager.status(&id).unwrap();
        assert_eq!(snapshot.parameters.pages, 2);
        assert_eq!(snapshot.parameters.output, "books");
        assert_eq!(
            snapshot.parameters.format,
            crate::pipeline::OutputFormat::Both
        );
    }
}
