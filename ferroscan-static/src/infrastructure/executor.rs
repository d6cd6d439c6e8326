//! Tool subprocess executor
//!
//! Runs one configured tool against a project path, captures stdout and
//! exit status, and classifies failures. Each invocation gets its own
//! timeout so a wedged tool cannot hold the analyzer hostage.

use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, instrument};

use ferroscan_core::config::ToolConfig;
use ferroscan_core::domain::analyzer::AnalyzeRequest;
use ferroscan_core::domain::finding::Finding;

use crate::domain::{ToolError, ToolOutputParser, render_args};

/// Executes external static-analysis tools.
pub struct ToolExecutor {
    parser: Arc<dyn ToolOutputParser>,
}

impl ToolExecutor {
    pub fn new(parser: Arc<dyn ToolOutputParser>) -> Self {
        Self { parser }
    }

    /// Run `tool` against the request's project path and parse its output.
    #[instrument(skip(self, tool, request), fields(tool = %tool.name))]
    pub async fn run_tool(
        &self,
        tool: &ToolConfig,
        request: &AnalyzeRequest,
    ) -> Result<Vec<Finding>, ToolError> {
        let args = render_args(tool, &request.project_path);

        let mut cmd = Command::new(&tool.command);
        cmd.args(&args).kill_on_drop(true);

        debug!(command = %tool.command, ?args, "executing tool");

        let output = tokio::time::timeout(
            Duration::from_secs(tool.timeout_seconds),
            cmd.output(),
        )
        .await
        .map_err(|_| ToolError::Timeout {
            tool: tool.name.clone(),
            seconds: tool.timeout_seconds,
        })?
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ToolError::NotInstalled(tool.name.clone())
            } else {
                ToolError::ExecutionFailed {
                    tool: tool.name.clone(),
                    code: None,
                    stderr: e.to_string(),
                }
            }
        })?;

        if !output.status.success() {
            return Err(ToolError::ExecutionFailed {
                tool: tool.name.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        self.parser.parse(tool, &stdout, request)
    }
}
