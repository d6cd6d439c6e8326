//! Default tool output contract
//!
//! Parses a JSON array of finding objects, the format our tool wrappers
//! normalize to. Tools with other native formats get their own
//! [`ToolOutputParser`] implementation.

use serde::Deserialize;

use ferroscan_core::config::ToolConfig;
use ferroscan_core::domain::analyzer::AnalyzeRequest;
use ferroscan_core::domain::finding::{
    DetectionMethod, Finding, Location, Severity, VulnerabilityType,
};

use crate::domain::{ToolError, ToolOutputParser};

/// Static findings carry high default confidence; tools report what they
/// can prove, unlike model inference.
const DEFAULT_STATIC_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Deserialize)]
struct RawToolFinding {
    file_path: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default = "default_type")]
    vulnerability_type: VulnerabilityType,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    description: String,
    #[serde(default)]
    recommendation: Option<String>,
    #[serde(default)]
    code_snippet: Option<String>,
    #[serde(default = "default_confidence")]
    confidence: f64,
}

fn default_type() -> VulnerabilityType {
    VulnerabilityType::Other
}

fn default_confidence() -> f64 {
    DEFAULT_STATIC_CONFIDENCE
}

/// Parser for the normalized JSON findings contract.
#[derive(Debug, Default, Clone)]
pub struct JsonFindingsParser;

impl ToolOutputParser for JsonFindingsParser {
    fn parse(
        &self,
        tool: &ToolConfig,
        stdout: &str,
        request: &AnalyzeRequest,
    ) -> Result<Vec<Finding>, ToolError> {
        let raw: Vec<RawToolFinding> =
            serde_json::from_str(stdout.trim()).map_err(|e| ToolError::OutputParse {
                tool: tool.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(raw
            .into_iter()
            .map(|entry| {
                let mut location = Location::new(entry.file_path);
                if let Some(line) = entry.line {
                    location = location.with_line(line);
                }

                let mut finding = Finding::new(
                    &request.project_id,
                    location,
                    &request.language,
                    entry.vulnerability_type,
                    entry.severity,
                    DetectionMethod::Static,
                    if entry.description.is_empty() {
                        format!("reported by {}", tool.name)
                    } else {
                        entry.description
                    },
                )
                .with_confidence(entry.confidence)
                .with_recommendation(entry.recommendation.unwrap_or_default());

                if let Some(snippet) = entry.code_snippet {
                    finding = finding.with_snippet(snippet);
                }
                finding
            })
            .collect())
    }
}
