//! Orchestrator domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ferroscan_core::domain::finding::{Finding, Severity};

use super::value_objects::{JobStatus, JobTransition, JobTransitionError};

/// Count of findings per severity level. All five levels are always
/// present, zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeveritySummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }
}

/// The stateful record of one orchestration run.
///
/// Owned exclusively by the orchestrator while running; everyone else sees
/// published snapshots. Once terminal, the value never changes again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisJob {
    pub id: Uuid,
    pub project_id: String,
    pub project_name: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Final de-duplicated finding set; empty until the merge completes.
    pub findings: Vec<Finding>,
    pub summary: SeveritySummary,
    /// Set only when status is `Failed`.
    pub error: Option<String>,
    /// Ordered history of state transitions (audit trail).
    #[serde(default)]
    pub transitions: Vec<JobTransition>,
}

impl AnalysisJob {
    pub fn new(project_id: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: project_id.into(),
            project_name: project_name.into(),
            status: JobStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
            findings: Vec::new(),
            summary: SeveritySummary::default(),
            error: None,
            transitions: Vec::new(),
        }
    }

    /// Validated state transition. Records the audit-trail entry and the
    /// lifecycle timestamps: `started_at` when entering `Running`,
    /// `ended_at` exactly once when entering a terminal state.
    pub fn transition(
        &mut self,
        target: JobStatus,
        reason: Option<String>,
    ) -> Result<(), JobTransitionError> {
        if !self.status.can_transition_to(&target) {
            return Err(JobTransitionError {
                from: self.status,
                to: target,
            });
        }

        let now = Utc::now();
        self.transitions.push(JobTransition {
            from: self.status,
            to: target,
            timestamp: now,
            reason,
        });

        if target == JobStatus::Running {
            self.started_at = Some(now);
        }
        if target.is_terminal() {
            self.ended_at = Some(now);
        }
        self.status = target;
        Ok(())
    }

    /// Terminal success: populate findings and summary in the same step as
    /// the status change so no reader can observe one without the other.
    pub fn complete(
        &mut self,
        findings: Vec<Finding>,
        summary: SeveritySummary,
    ) -> Result<(), JobTransitionError> {
        self.transition(
            JobStatus::Completed,
            Some(format!("completed with {} findings", findings.len())),
        )?;
        self.findings = findings;
        self.summary = summary;
        Ok(())
    }

    /// Terminal failure: reached only when no analyzer produced usable
    /// results.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), JobTransitionError> {
        let error = error.into();
        self.transition(JobStatus::Failed, Some(error.clone()))?;
        self.error = Some(error);
        Ok(())
    }
}
