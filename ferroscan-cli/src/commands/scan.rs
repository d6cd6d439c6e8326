//! Scan command - hybrid vulnerability analysis
//!
//! Starts one analysis job against a project directory, polls the job
//! store until the job ends, and reports the merged findings.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use ferroscan_core::config::Config;
use ferroscan_orchestrator::{
    AnalysisJob, AnalysisOrchestrator, InMemoryJobStore, JobStatus, StartAnalysis,
};

use crate::Cli;
use crate::commands::build_registry;
use crate::exit_codes;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Path to the project directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Source language of the project
    #[arg(long, default_value = "c")]
    pub language: String,

    /// Human-readable project name (defaults to the directory name)
    #[arg(long)]
    pub project_name: Option<String>,

    /// Exit non-zero when any finding is reported
    #[arg(long)]
    pub fail_on_findings: bool,

    /// Poll interval while waiting for the job, in milliseconds
    #[arg(long, default_value_t = 250)]
    pub poll_interval_ms: u64,
}

/// Run the scan command
pub async fn run(cli: &Cli, config: &Config, args: &ScanArgs) -> Result<i32> {
    let path = match args.path.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("cannot open project path {:?}: {e}", args.path);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let project_name = args.project_name.clone().unwrap_or_else(|| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    });

    if !cli.quiet && cli.format != "json" {
        println!("Scanning {:?} ({})", path, args.language);
    }

    let registry = build_registry(config);
    let job_timeout = config.orchestrator.job_timeout();
    let orchestrator = AnalysisOrchestrator::new(
        Arc::new(registry),
        Arc::new(InMemoryJobStore::new()),
        job_timeout,
    );

    let job_id = orchestrator
        .start_analysis(StartAnalysis {
            project_id: project_name.clone(),
            project_name,
            project_path: path,
            language: args.language.clone(),
        })
        .await
        .context("failed to start analysis")?;

    // The job deadline bounds the analyzers; leave headroom for fan-in
    // and publishing before giving up on the poll loop.
    let poll_budget = job_timeout + Duration::from_secs(30);
    let poll_interval = Duration::from_millis(args.poll_interval_ms.max(10));
    let deadline = tokio::time::Instant::now() + poll_budget;

    let job = loop {
        if let Some(snapshot) = orchestrator
            .get_job(job_id)
            .await
            .context("failed to read job state")?
            && snapshot.status.is_terminal()
        {
            break snapshot;
        }
        if tokio::time::Instant::now() >= deadline {
            eprintln!("analysis did not finish within {poll_budget:?}");
            return Ok(exit_codes::INTERNAL_ERROR);
        }
        tokio::time::sleep(poll_interval).await;
    };

    if cli.format == "json" {
        println!("{}", serde_json::to_string_pretty(&*job)?);
    } else {
        print_report(&job);
    }

    match job.status {
        JobStatus::Failed => Ok(exit_codes::ANALYSIS_FAILED),
        _ if args.fail_on_findings && !job.findings.is_empty() => {
            Ok(exit_codes::VULNERABILITIES_FOUND)
        }
        _ => Ok(exit_codes::SUCCESS),
    }
}

fn print_report(job: &AnalysisJob) {
    if job.status == JobStatus::Failed {
        eprintln!(
            "Analysis failed: {}",
            job.error.as_deref().unwrap_or("unknown error")
        );
        return;
    }

    if job.findings.is_empty() {
        println!("No vulnerabilities found.");
        return;
    }

    for finding in &job.findings {
        let line = finding
            .location
            .line
            .map(|l| format!(":{l}"))
            .unwrap_or_default();
        println!(
            "[{}] {}{} ({:?}, {:?}) - {}",
            finding.severity,
            finding.location.file_path,
            line,
            finding.vulnerability_type,
            finding.detection_method,
            finding.description
        );
    }

    println!(
        "\nSummary: {} total ({} critical, {} high, {} medium, {} low, {} info)",
        job.summary.total(),
        job.summary.critical,
        job.summary.high,
        job.summary.medium,
        job.summary.low,
        job.summary.info
    );
}
