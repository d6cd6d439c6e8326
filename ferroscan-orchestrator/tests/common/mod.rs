//! Shared test doubles for orchestrator integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use ferroscan_core::domain::analyzer::{AnalyzeRequest, Analyzer, AnalyzerError};
use ferroscan_core::domain::finding::{
    DetectionMethod, Finding, Location, Severity, VulnerabilityType,
};
use ferroscan_orchestrator::{AnalysisJob, AnalysisOrchestrator, StartAnalysis};

pub fn finding(
    path: &str,
    line: Option<u32>,
    severity: Severity,
    confidence: f64,
    method: DetectionMethod,
) -> Finding {
    let mut location = Location::new(path);
    if let Some(line) = line {
        location = location.with_line(line);
    }
    Finding::new(
        "proj-1",
        location,
        "c",
        VulnerabilityType::BufferOverflow,
        severity,
        method,
        "test finding",
    )
    .with_confidence(confidence)
}

pub fn start_request() -> StartAnalysis {
    StartAnalysis {
        project_id: "proj-1".to_string(),
        project_name: "legacy-billing".to_string(),
        project_path: "/tmp/proj-1".into(),
        language: "c".to_string(),
    }
}

/// Analyzer returning a fixed result set.
pub struct StubAnalyzer {
    pub name: &'static str,
    pub findings: Vec<Finding>,
    pub delay: Duration,
}

impl StubAnalyzer {
    pub fn returning(name: &'static str, findings: Vec<Finding>) -> Arc<Self> {
        Arc::new(Self {
            name,
            findings,
            delay: Duration::ZERO,
        })
    }

    pub fn slow(name: &'static str, findings: Vec<Finding>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            findings,
            delay,
        })
    }
}

#[async_trait]
impl Analyzer for StubAnalyzer {
    fn name(&self) -> &str {
        self.name
    }

    async fn analyze(&self, _: &AnalyzeRequest) -> Result<Vec<Finding>, AnalyzerError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.findings.clone())
    }
}

/// Analyzer that always fails.
pub struct FailingAnalyzer {
    pub name: &'static str,
    pub message: &'static str,
}

impl FailingAnalyzer {
    pub fn new(name: &'static str, message: &'static str) -> Arc<Self> {
        Arc::new(Self { name, message })
    }
}

#[async_trait]
impl Analyzer for FailingAnalyzer {
    fn name(&self) -> &str {
        self.name
    }

    async fn analyze(&self, _: &AnalyzeRequest) -> Result<Vec<Finding>, AnalyzerError> {
        Err(AnalyzerError::Model(self.message.to_string()))
    }
}

/// Analyzer whose task panics, to exercise fault isolation.
pub struct PanickingAnalyzer;

#[async_trait]
impl Analyzer for PanickingAnalyzer {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn analyze(&self, _: &AnalyzeRequest) -> Result<Vec<Finding>, AnalyzerError> {
        panic!("analyzer blew up");
    }
}

/// Poll until the job reaches a terminal state.
pub async fn wait_for_terminal(
    orchestrator: &AnalysisOrchestrator,
    job_id: Uuid,
) -> Arc<AnalysisJob> {
    for _ in 0..200 {
        if let Some(snapshot) = orchestrator.get_job(job_id).await.unwrap()
            && snapshot.status.is_terminal()
        {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not reach a terminal state in time");
}
