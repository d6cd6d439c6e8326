//! Static analyzer
//!
//! Iterates the configured tool list, collecting findings from every tool
//! that succeeds. Tool failures are logged with attribution and skipped;
//! the analyzer itself fails only when every configured tool failed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use ferroscan_core::config::StaticAnalysisConfig;
use ferroscan_core::domain::analyzer::{AnalyzeRequest, Analyzer, AnalyzerError};
use ferroscan_core::domain::finding::Finding;

use crate::domain::ToolOutputParser;
use crate::infrastructure::executor::ToolExecutor;
use crate::infrastructure::parser::JsonFindingsParser;

pub const ANALYZER_NAME: &str = "static";

/// Rule-based vulnerability analyzer driving external tools.
pub struct StaticAnalyzer {
    config: StaticAnalysisConfig,
    executor: ToolExecutor,
}

impl StaticAnalyzer {
    pub fn new(config: StaticAnalysisConfig) -> Self {
        Self::with_parser(config, Arc::new(JsonFindingsParser::default()))
    }

    pub fn with_parser(config: StaticAnalysisConfig, parser: Arc<dyn ToolOutputParser>) -> Self {
        Self {
            config,
            executor: ToolExecutor::new(parser),
        }
    }
}

#[async_trait]
impl Analyzer for StaticAnalyzer {
    fn name(&self) -> &str {
        ANALYZER_NAME
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<Finding>, AnalyzerError> {
        let mut findings = Vec::new();
        let mut failures = Vec::new();

        for tool in &self.config.tools {
            match self.executor.run_tool(tool, request).await {
                Ok(tool_findings) => {
                    info!(
                        tool = %tool.name,
                        findings = tool_findings.len(),
                        "tool completed"
                    );
                    findings.extend(tool_findings);
                }
                Err(err) => {
                    warn!(tool = %tool.name, error = %err, "tool failed, skipping");
                    failures.push(format!("{}: {}", tool.name, err));
                }
            }
        }

        // Partial tool failure is tolerated; total failure is not.
        if findings.is_empty() && !failures.is_empty() && failures.len() == self.config.tools.len()
        {
            return Err(AnalyzerError::Tool(format!(
                "all configured tools failed: {}",
                failures.join("; ")
            )));
        }

        Ok(findings)
    }
}
