//! Job snapshot store
//!
//! Jobs are published as whole immutable snapshots: the orchestrator builds
//! the complete job value and swaps it in, so a poller always reads either
//! the pending/running snapshot or the final frozen one — never a record
//! mid-transition. Durable backends implement the same trait keyed by
//! job id.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::AnalysisJob;

/// Job persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum JobStoreError {
    #[error("storage operation failed: {0}")]
    Storage(String),
}

/// Job snapshot storage interface.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Publish a snapshot, replacing any previous snapshot for the job
    /// atomically.
    async fn publish(&self, job: AnalysisJob) -> Result<(), JobStoreError>;

    /// Read the latest published snapshot.
    async fn get(&self, job_id: Uuid) -> Result<Option<Arc<AnalysisJob>>, JobStoreError>;
}

/// In-memory snapshot store.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Arc<AnalysisJob>>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn publish(&self, job: AnalysisJob) -> Result<(), JobStoreError> {
        debug!(job_id = %job.id, status = %job.status, "publishing job snapshot");
        self.jobs.write().await.insert(job.id, Arc::new(job));
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<Arc<AnalysisJob>>, JobStoreError> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::JobStatus;

    #[tokio::test]
    async fn publish_replaces_previous_snapshot() {
        let store = InMemoryJobStore::new();
        let mut job = AnalysisJob::new("p1", "legacy");
        let job_id = job.id;

        store.publish(job.clone()).await.unwrap();
        assert_eq!(
            store.get(job_id).await.unwrap().unwrap().status,
            JobStatus::Pending
        );

        job.transition(JobStatus::Running, None).unwrap();
        store.publish(job).await.unwrap();
        let snapshot = store.get(job_id).await.unwrap().unwrap();
        assert_eq!(snapshot.status, JobStatus::Running);
        assert!(snapshot.started_at.is_some());
    }

    #[tokio::test]
    async fn missing_job_reads_as_none() {
        let store = InMemoryJobStore::new();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }
}
