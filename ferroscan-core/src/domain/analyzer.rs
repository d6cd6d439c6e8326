//! Analyzer capability trait
//!
//! Both analysis engines (semantic and static) implement [`Analyzer`] and
//! are driven by the orchestrator through dynamic dispatch. An analyzer that
//! fails returns an error and no findings; it never returns a silently
//! truncated partial result.

use std::path::PathBuf;

use async_trait::async_trait;

use super::finding::Finding;

/// One analysis request, shared by every analyzer dispatched for a job.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub project_id: String,
    pub project_path: PathBuf,
    pub language: String,
}

impl AnalyzeRequest {
    pub fn new(
        project_id: impl Into<String>,
        project_path: impl Into<PathBuf>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            project_path: project_path.into(),
            language: language.into(),
        }
    }
}

/// Per-analyzer failure. Always caught at fan-in and attributed to the
/// producing analyzer; one analyzer's failure never aborts its siblings.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("model invocation failed: {0}")]
    Model(String),

    #[error("tool execution failed: {0}")]
    Tool(String),

    #[error("failed to parse analyzer output: {0}")]
    Parse(String),

    #[error("analyzer timed out after {0}s")]
    Timeout(u64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A pluggable analysis engine producing findings for a project snapshot.
///
/// Implementations must not mutate shared state beyond their own internal
/// caches. Calls may take arbitrarily long; the orchestrator applies the
/// job deadline externally and cancellation is observed at `.await` points.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Stable analyzer name, used for failure attribution and registry
    /// lookup.
    fn name(&self) -> &str;

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<Finding>, AnalyzerError>;
}
