//! End-to-end orchestration tests: fan-out, failure isolation, timeout
//! handling, merge outcome and job lifecycle, all against in-memory
//! analyzers and job store.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use ferroscan_core::domain::finding::{DetectionMethod, Severity};
use ferroscan_orchestrator::{
    AnalysisOrchestrator, AnalyzerRegistry, AnalyzerSettings, InMemoryJobStore, JobStatus,
};

fn orchestrator_with(registry: AnalyzerRegistry, timeout: Duration) -> AnalysisOrchestrator {
    AnalysisOrchestrator::new(
        Arc::new(registry),
        Arc::new(InMemoryJobStore::new()),
        timeout,
    )
}

#[tokio::test]
async fn agreement_across_analyzers_produces_one_hybrid_finding() {
    let mut registry = AnalyzerRegistry::new();
    registry.register(StubAnalyzer::returning(
        "static",
        vec![finding("a.c", Some(10), Severity::High, 0.8, DetectionMethod::Static)],
    ));
    registry.register(StubAnalyzer::returning(
        "semantic",
        vec![finding("a.c", Some(10), Severity::Critical, 0.9, DetectionMethod::Semantic)],
    ));

    let orchestrator = orchestrator_with(registry, Duration::from_secs(5));
    let job_id = orchestrator.start_analysis(start_request()).await.unwrap();
    let snapshot = wait_for_terminal(&orchestrator, job_id).await;

    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.findings.len(), 1);
    assert_eq!(snapshot.findings[0].detection_method, DetectionMethod::Hybrid);
    assert_eq!(snapshot.findings[0].severity, Severity::Critical);
    assert!((snapshot.findings[0].confidence - 0.9).abs() < f64::EPSILON);
    assert_eq!(snapshot.summary.critical, 1);
    assert!(snapshot.error.is_none());
    assert!(snapshot.ended_at.is_some());
}

#[tokio::test]
async fn partial_failure_still_completes_with_survivor_findings() {
    let mut registry = AnalyzerRegistry::new();
    registry.register(StubAnalyzer::returning(
        "static",
        vec![finding("b.c", Some(5), Severity::Medium, 0.8, DetectionMethod::Static)],
    ));
    registry.register(FailingAnalyzer::new("semantic", "model unreachable"));

    let orchestrator = orchestrator_with(registry, Duration::from_secs(5));
    let job_id = orchestrator.start_analysis(start_request()).await.unwrap();
    let snapshot = wait_for_terminal(&orchestrator, job_id).await;

    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.findings.len(), 1);
    assert_eq!(snapshot.findings[0].location.file_path, "b.c");
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn all_analyzers_failing_fails_the_job_with_both_reasons() {
    let mut registry = AnalyzerRegistry::new();
    registry.register(FailingAnalyzer::new("static", "tool missing"));
    registry.register(FailingAnalyzer::new("semantic", "model unreachable"));

    let orchestrator = orchestrator_with(registry, Duration::from_secs(5));
    let job_id = orchestrator.start_analysis(start_request()).await.unwrap();
    let snapshot = wait_for_terminal(&orchestrator, job_id).await;

    assert_eq!(snapshot.status, JobStatus::Failed);
    assert!(snapshot.findings.is_empty());
    assert_eq!(snapshot.summary.total(), 0);
    let error = snapshot.error.as_deref().unwrap();
    assert!(error.contains("static: "));
    assert!(error.contains("tool missing"));
    assert!(error.contains("semantic: "));
    assert!(error.contains("model unreachable"));
}

#[tokio::test]
async fn slow_analyzer_is_timed_out_and_treated_as_failed() {
    let mut registry = AnalyzerRegistry::new();
    registry.register(StubAnalyzer::returning(
        "static",
        vec![finding("b.c", Some(5), Severity::High, 0.8, DetectionMethod::Static)],
    ));
    registry.register(StubAnalyzer::slow(
        "semantic",
        vec![finding("late.c", Some(1), Severity::Critical, 0.9, DetectionMethod::Semantic)],
        Duration::from_secs(30),
    ));

    let orchestrator = orchestrator_with(registry, Duration::from_millis(200));
    let job_id = orchestrator.start_analysis(start_request()).await.unwrap();
    let snapshot = wait_for_terminal(&orchestrator, job_id).await;

    // Static finished inside the deadline; the job completes with exactly
    // its finding and no error, the timed-out analyzer contributes nothing.
    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.findings.len(), 1);
    assert_eq!(snapshot.findings[0].location.file_path, "b.c");
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn panicking_analyzer_does_not_abort_siblings() {
    let mut registry = AnalyzerRegistry::new();
    registry.register(Arc::new(PanickingAnalyzer));
    registry.register(StubAnalyzer::returning(
        "static",
        vec![finding("c.c", Some(2), Severity::Low, 0.8, DetectionMethod::Static)],
    ));

    let orchestrator = orchestrator_with(registry, Duration::from_secs(5));
    let job_id = orchestrator.start_analysis(start_request()).await.unwrap();
    let snapshot = wait_for_terminal(&orchestrator, job_id).await;

    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.findings.len(), 1);
}

#[tokio::test]
async fn start_returns_before_completion_and_poller_sees_running() {
    let mut registry = AnalyzerRegistry::new();
    registry.register(StubAnalyzer::slow(
        "static",
        vec![],
        Duration::from_millis(300),
    ));

    let orchestrator = orchestrator_with(registry, Duration::from_secs(5));
    let job_id = orchestrator.start_analysis(start_request()).await.unwrap();

    let snapshot = orchestrator.get_job(job_id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Running);
    assert!(snapshot.started_at.is_some());
    assert!(snapshot.ended_at.is_none());

    let terminal = wait_for_terminal(&orchestrator, job_id).await;
    assert_eq!(terminal.status, JobStatus::Completed);
}

#[tokio::test]
async fn disabled_analyzer_is_skipped_at_fan_out() {
    let mut registry = AnalyzerRegistry::new();
    registry.register(StubAnalyzer::returning(
        "static",
        vec![finding("a.c", Some(1), Severity::Low, 0.8, DetectionMethod::Static)],
    ));
    registry.register(FailingAnalyzer::new("semantic", "would fail if dispatched"));

    let mut disabled = AnalyzerSettings::new();
    disabled.enabled = false;

    let orchestrator = orchestrator_with(registry, Duration::from_secs(5));
    orchestrator
        .update_analyzer_config("semantic", disabled)
        .unwrap();

    let job_id = orchestrator.start_analysis(start_request()).await.unwrap();
    let snapshot = wait_for_terminal(&orchestrator, job_id).await;

    assert_eq!(snapshot.status, JobStatus::Completed);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn no_registered_analyzers_completes_empty() {
    let orchestrator = orchestrator_with(AnalyzerRegistry::new(), Duration::from_secs(5));
    let job_id = orchestrator.start_analysis(start_request()).await.unwrap();
    let snapshot = wait_for_terminal(&orchestrator, job_id).await;

    assert_eq!(snapshot.status, JobStatus::Completed);
    assert!(snapshot.findings.is_empty());
    assert_eq!(snapshot.summary.total(), 0);
}

#[tokio::test]
async fn concurrent_jobs_do_not_interfere() {
    let mut registry = AnalyzerRegistry::new();
    registry.register(StubAnalyzer::returning(
        "static",
        vec![finding("a.c", Some(1), Severity::High, 0.8, DetectionMethod::Static)],
    ));

    let orchestrator = orchestrator_with(registry, Duration::from_secs(5));
    let first = orchestrator.start_analysis(start_request()).await.unwrap();
    let second = orchestrator.start_analysis(start_request()).await.unwrap();
    assert_ne!(first, second);

    let first_snapshot = wait_for_terminal(&orchestrator, first).await;
    let second_snapshot = wait_for_terminal(&orchestrator, second).await;
    assert_eq!(first_snapshot.status, JobStatus::Completed);
    assert_eq!(second_snapshot.status, JobStatus::Completed);
    assert_eq!(first_snapshot.findings.len(), 1);
    assert_eq!(second_snapshot.findings.len(), 1);
}
