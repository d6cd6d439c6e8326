//! Analysis orchestrator
//!
//! Owns the job lifecycle: create pending, dispatch every enabled analyzer
//! as its own task so failures and panics are isolated per analyzer, wait
//! for all of them to settle (each bounded by a deadline), then merge and
//! publish one terminal snapshot. The caller gets the job id immediately;
//! the run proceeds in the background.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use ferroscan_core::domain::analyzer::{AnalyzeRequest, AnalyzerError};
use ferroscan_core::domain::finding::Finding;

use crate::domain::entities::AnalysisJob;
use crate::domain::merge::merge_result_sets;
use crate::domain::value_objects::{JobStatus, JobTransitionError};
use crate::infrastructure::job_store::{JobStore, JobStoreError};
use crate::infrastructure::registry::{AnalyzerHandle, AnalyzerRegistry, AnalyzerSettings, ConfigError};

/// Request to analyze one project.
#[derive(Debug, Clone)]
pub struct StartAnalysis {
    pub project_id: String,
    pub project_name: String,
    pub project_path: std::path::PathBuf,
    pub language: String,
}

/// Errors surfaced to callers of the orchestrator API.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("job persistence failed: {0}")]
    Store(#[from] JobStoreError),

    #[error(transparent)]
    Transition(#[from] JobTransitionError),
}

/// Drives hybrid analysis jobs. One instance serves many concurrent jobs;
/// the registry is the only state they share.
pub struct AnalysisOrchestrator {
    registry: Arc<AnalyzerRegistry>,
    job_store: Arc<dyn JobStore>,
    job_timeout: Duration,
}

impl AnalysisOrchestrator {
    pub fn new(
        registry: Arc<AnalyzerRegistry>,
        job_store: Arc<dyn JobStore>,
        job_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            job_store,
            job_timeout,
        }
    }

    /// Start an analysis job. Returns the job id as soon as the running
    /// snapshot is published; the analyzer fan-out proceeds asynchronously.
    #[instrument(skip(self, request), fields(project_id = %request.project_id))]
    pub async fn start_analysis(&self, request: StartAnalysis) -> Result<Uuid, OrchestratorError> {
        let mut job = AnalysisJob::new(&request.project_id, &request.project_name);
        let job_id = job.id;
        self.job_store.publish(job.clone()).await?;

        job.transition(JobStatus::Running, Some("analyzers dispatched".into()))?;
        self.job_store.publish(job.clone()).await?;
        info!(job_id = %job_id, "analysis job started");

        let handles = self.registry.snapshot();
        let analyze_request = Arc::new(AnalyzeRequest::new(
            request.project_id,
            request.project_path,
            request.language,
        ));
        let job_store = Arc::clone(&self.job_store);
        let job_timeout = self.job_timeout;

        tokio::spawn(async move {
            Self::run_job(job, handles, analyze_request, job_store, job_timeout).await;
        });

        Ok(job_id)
    }

    /// Read the latest published snapshot of a job.
    pub async fn get_job(&self, job_id: Uuid) -> Result<Option<Arc<AnalysisJob>>, JobStoreError> {
        self.job_store.get(job_id).await
    }

    /// Replace one analyzer's settings. Rejections are synchronous and
    /// never disturb jobs already running on the previous snapshot.
    pub fn update_analyzer_config(
        &self,
        name: &str,
        settings: AnalyzerSettings,
    ) -> Result<(), ConfigError> {
        self.registry.update_settings(name, settings)
    }

    pub fn analyzer_names(&self) -> Vec<String> {
        self.registry.analyzer_names()
    }

    async fn run_job(
        mut job: AnalysisJob,
        handles: Vec<AnalyzerHandle>,
        request: Arc<AnalyzeRequest>,
        job_store: Arc<dyn JobStore>,
        job_timeout: Duration,
    ) {
        let dispatched: Vec<(String, JoinHandle<Result<Vec<Finding>, AnalyzerError>>)> = handles
            .into_iter()
            .filter(|handle| {
                if !handle.settings.enabled {
                    info!(job_id = %job.id, analyzer = %handle.name, "analyzer disabled, skipping");
                }
                handle.settings.enabled
            })
            .map(|handle| {
                let request = Arc::clone(&request);
                let deadline = handle
                    .settings
                    .timeout_override_seconds
                    .map(Duration::from_secs)
                    .unwrap_or(job_timeout);
                let name = handle.name.clone();
                let task = tokio::spawn(async move {
                    match tokio::time::timeout(deadline, handle.analyzer.analyze(&request)).await {
                        Ok(result) => result,
                        Err(_) => Err(AnalyzerError::Timeout(deadline.as_secs())),
                    }
                });
                (name, task)
            })
            .collect();

        // Fan-in: await every dispatched analyzer, in registry order so the
        // merge sees result sets in trust order regardless of completion
        // order. Failures are captured per analyzer, never aggregated into
        // one fault.
        let mut successes: Vec<Vec<Finding>> = Vec::new();
        let mut failures: Vec<(String, String)> = Vec::new();
        let dispatched_count = dispatched.len();

        for (name, task) in dispatched {
            match task.await {
                Ok(Ok(findings)) => {
                    info!(
                        job_id = %job.id,
                        analyzer = %name,
                        findings = findings.len(),
                        "analyzer succeeded"
                    );
                    successes.push(findings);
                }
                Ok(Err(err)) => {
                    warn!(job_id = %job.id, analyzer = %name, error = %err, "analyzer failed");
                    failures.push((name, err.to_string()));
                }
                Err(join_err) => {
                    error!(job_id = %job.id, analyzer = %name, error = %join_err, "analyzer task aborted");
                    failures.push((name, format!("task aborted: {join_err}")));
                }
            }
        }

        // Outcome rule: partial success is success; the job fails only when
        // every dispatched analyzer failed.
        let transition = if successes.is_empty() && dispatched_count > 0 {
            let message = failures
                .iter()
                .map(|(name, reason)| format!("{name}: {reason}"))
                .collect::<Vec<_>>()
                .join("; ");
            error!(job_id = %job.id, error = %message, "all analyzers failed");
            job.fail(message)
        } else {
            let report = merge_result_sets(successes);
            info!(
                job_id = %job.id,
                findings = report.findings.len(),
                analyzers_failed = failures.len(),
                "job completed"
            );
            job.complete(report.findings, report.summary)
        };

        if let Err(err) = transition {
            // Unreachable while the orchestrator owns the job exclusively.
            error!(job_id = %job.id, error = %err, "terminal transition rejected");
            return;
        }

        if let Err(err) = job_store.publish(job).await {
            error!(error = %err, "failed to publish terminal job snapshot");
        }
    }
}
