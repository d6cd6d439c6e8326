//! Semantic analyzer
//!
//! Pipeline: read project source, retrieve security context, prompt the
//! model, parse the structured reply into findings. A reply that cannot be
//! parsed yields one low-confidence `other` finding flagging the failure,
//! so the analyzer never silently returns nothing.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use ferroscan_core::config::LlmConfig;
use ferroscan_core::domain::analyzer::{AnalyzeRequest, Analyzer, AnalyzerError};
use ferroscan_core::domain::finding::{
    DetectionMethod, Finding, Location, Severity, VulnerabilityType,
};
use ferroscan_core::infrastructure::source::SourceReader;

use crate::domain::provider::{ContextStore, InferenceProvider};
use crate::infrastructure::prompts::PromptBuilder;
use crate::infrastructure::response_parser::ResponseParser;

pub const ANALYZER_NAME: &str = "semantic";

/// One finding as reported by the model. Lenient: missing fields get
/// defaults rather than discarding the whole reply.
#[derive(Debug, Deserialize)]
struct RawModelFinding {
    #[serde(default = "default_vulnerability_type")]
    vulnerability_type: VulnerabilityType,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    description: String,
    #[serde(default)]
    file_path: Option<String>,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    code_snippet: Option<String>,
    #[serde(default)]
    recommendation: Option<String>,
    #[serde(default = "default_confidence")]
    confidence: f64,
}

fn default_vulnerability_type() -> VulnerabilityType {
    VulnerabilityType::Other
}

fn default_confidence() -> f64 {
    0.5
}

/// LLM-driven vulnerability analyzer.
pub struct SemanticAnalyzer {
    provider: Arc<dyn InferenceProvider>,
    context_store: Arc<dyn ContextStore>,
    source_reader: Arc<dyn SourceReader>,
    config: LlmConfig,
}

impl SemanticAnalyzer {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        context_store: Arc<dyn ContextStore>,
        source_reader: Arc<dyn SourceReader>,
        config: LlmConfig,
    ) -> Self {
        Self {
            provider,
            context_store,
            source_reader,
            config,
        }
    }

    fn convert(&self, raw: RawModelFinding, request: &AnalyzeRequest) -> Finding {
        let file_path = raw
            .file_path
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| request.project_path.display().to_string());
        let mut location = Location::new(file_path);
        if let Some(line) = raw.line {
            location = location.with_line(line);
        }

        let mut finding = Finding::new(
            &request.project_id,
            location,
            &request.language,
            raw.vulnerability_type,
            raw.severity,
            DetectionMethod::Semantic,
            if raw.description.is_empty() {
                "no description provided".to_string()
            } else {
                raw.description
            },
        )
        .with_confidence(raw.confidence)
        .with_recommendation(raw.recommendation.unwrap_or_default());

        if let Some(snippet) = raw.code_snippet {
            finding = finding.with_snippet(snippet);
        }
        finding
    }

    /// Fallback finding when the model reply is not parseable JSON. Keeps
    /// the contract that `analyze` never returns an empty result without
    /// signaling what happened.
    fn parse_failure_finding(&self, request: &AnalyzeRequest) -> Finding {
        Finding::new(
            &request.project_id,
            Location::new(request.project_path.display().to_string()),
            &request.language,
            VulnerabilityType::Other,
            Severity::Low,
            DetectionMethod::Semantic,
            "model response could not be parsed as structured findings; manual review recommended",
        )
        .with_confidence(0.1)
        .with_recommendation("re-run the analysis or inspect the project with static tools")
    }
}

#[async_trait]
impl Analyzer for SemanticAnalyzer {
    fn name(&self) -> &str {
        ANALYZER_NAME
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<Finding>, AnalyzerError> {
        let code = self
            .source_reader
            .read_project(
                &request.project_path,
                &request.language,
                self.config.max_source_bytes,
            )
            .await?;

        let context = self
            .context_store
            .find_relevant_context(&code, &request.language, self.config.context_documents)
            .await;

        let prompt = PromptBuilder::analysis_prompt(&request.language, &code, &context);
        debug!(
            prompt_len = prompt.len(),
            context_documents = context.len(),
            "invoking inference provider"
        );

        let response = self
            .provider
            .generate_findings(&prompt)
            .await
            .map_err(|e| AnalyzerError::Model(e.to_string()))?;

        match ResponseParser::parse_findings::<RawModelFinding>(&response) {
            Ok(raw_findings) => {
                let findings: Vec<Finding> = raw_findings
                    .into_iter()
                    .map(|raw| self.convert(raw, request))
                    .collect();
                info!(
                    project_id = %request.project_id,
                    findings = findings.len(),
                    "semantic analysis complete"
                );
                Ok(findings)
            }
            Err(err) => {
                warn!(
                    project_id = %request.project_id,
                    error = %err,
                    "model response was not parseable, emitting fallback finding"
                );
                Ok(vec![self.parse_failure_finding(request)])
            }
        }
    }
}
