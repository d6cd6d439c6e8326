//! Ferroscan orchestrator - hybrid analysis coordination
//!
//! Drives one analysis job end to end: fan out every registered analyzer
//! concurrently against the project, fan in their results tolerating
//! individual failure, merge the successful result sets into one
//! de-duplicated report, and publish the job's lifecycle as immutable
//! snapshots a poller can read race-free.
//!
//! ```text
//! caller ── start_analysis ──► AnalysisOrchestrator
//!                                   │ spawn per analyzer (deadline-bound)
//!                      ┌────────────┼────────────┐
//!                 static tools   semantic    (others)
//!                      └────────────┼────────────┘
//!                                fan-in (all settled)
//!                                   │
//!                             merge + summary
//!                                   │
//!                        terminal snapshot published
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::orchestrator::{AnalysisOrchestrator, OrchestratorError, StartAnalysis};
pub use domain::entities::{AnalysisJob, SeveritySummary};
pub use domain::merge::{MergedReport, merge_result_sets};
pub use domain::value_objects::{JobStatus, JobTransition, JobTransitionError};
pub use infrastructure::job_store::{InMemoryJobStore, JobStore, JobStoreError};
pub use infrastructure::registry::{AnalyzerRegistry, AnalyzerSettings, ConfigError};
