//! Read-side cache invalidation hook
//!
//! The read API keeps an in-memory view of the persisted files. After a job
//! completes with new data, the manager calls the injected notifier so the
//! read side reloads immediately instead of waiting for its next mtime poll.
//! Notification is best effort: a failure is logged and never changes the
//! job's terminal state.

use thiserror::Error;

/// Failure to signal the read-side cache
#[derive(Debug, Error)]
#[error("Cache notification failed: {0}")]
pub struct NotifyError(pub String);

/// Receives completion signals from the job manager
///
/// Implemented by the read-side repository (or an adapter in front of it)
/// and injected into the manager at construction, keeping the pipeline and
/// the read cache decoupled.
pub trait CacheNotifier: Send + Sync {
    /// Invalidate the cached view so the next read refetches from disk
    fn invalidate(&self) -> Result<(), NotifyError>;
}

/// Notifier for deployments without a read-side cache
pub struct NoopNotifier;

impl CacheNotifier for NoopNotifier {
    fn invalidate(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}
