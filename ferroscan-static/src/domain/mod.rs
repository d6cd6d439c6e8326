//! Static analyzer domain
//!
//! Tool invocations are described by [`ferroscan_core::config::ToolConfig`];
//! this module owns error classification and the per-tool output parsing
//! contract.

use std::path::Path;

use ferroscan_core::config::ToolConfig;
use ferroscan_core::domain::analyzer::AnalyzeRequest;
use ferroscan_core::domain::finding::Finding;

/// Per-tool failure classification.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool '{0}' not found in PATH")]
    NotInstalled(String),

    #[error("tool '{tool}' exited with {code:?}: {stderr}")]
    ExecutionFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("tool '{tool}' timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    #[error("failed to parse output of tool '{tool}': {reason}")]
    OutputParse { tool: String, reason: String },
}

/// Parses one tool's stdout into unified findings.
///
/// Tool-native wire formats live behind this trait; the analyzer only
/// depends on the contract.
pub trait ToolOutputParser: Send + Sync {
    fn parse(
        &self,
        tool: &ToolConfig,
        stdout: &str,
        request: &AnalyzeRequest,
    ) -> Result<Vec<Finding>, ToolError>;
}

/// Substitute the `{project_path}` placeholder into a tool's argument list.
pub fn render_args(tool: &ToolConfig, project_path: &Path) -> Vec<String> {
    let path = project_path.display().to_string();
    tool.args
        .iter()
        .map(|arg| arg.replace("{project_path}", &path))
        .collect()
}
