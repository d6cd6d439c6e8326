//! The unified finding record
//!
//! Every analyzer produces findings in this one format so the orchestrator
//! can merge results from engines that have nothing else in common.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Finding severity, ordered from most to least severe.
///
/// The derived `Ord` puts `Critical` first, so an ascending sort yields
/// critical-to-info report order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl Severity {
    /// All levels, most severe first. Summaries iterate this so every level
    /// is always present even when its count is zero.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];
}

/// Vulnerability classification.
///
/// Analyzer output is untrusted text; anything outside the known set
/// deserializes to [`VulnerabilityType::Other`] instead of failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VulnerabilityType {
    BufferOverflow,
    SqlInjection,
    Xss,
    Csrf,
    AuthBypass,
    InsecureDeserialization,
    #[serde(other)]
    Other,
}

/// How a finding was detected.
///
/// `Hybrid` is assigned by the merge engine when independent analyzers agree
/// on the same location; analyzers themselves only ever emit `Semantic` or
/// `Static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Semantic,
    Static,
    Hybrid,
}

/// Location of a finding in the analyzed project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file_path: String,
    /// 1-indexed line number; `None` when the producing tool could not
    /// pin the finding to a line.
    pub line: Option<u32>,
}

impl Location {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Key used to recognize the same underlying issue reported by multiple
    /// analyzers. Findings without a line number have no stable anchor and
    /// are never treated as duplicates of anything.
    pub fn dedup_key(&self) -> Option<(&str, u32)> {
        self.line.map(|line| (self.file_path.as_str(), line))
    }
}

/// One detected vulnerability.
///
/// Findings are immutable once constructed: analyzers and the merge engine
/// build new values rather than editing existing ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: Uuid,
    pub project_id: String,
    pub location: Location,
    pub language: String,
    pub vulnerability_type: VulnerabilityType,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    /// Confidence in [0.0, 1.0], clamped at construction.
    pub confidence: f64,
    pub detection_method: DetectionMethod,
    pub created_at: DateTime<Utc>,
}

impl Finding {
    pub fn new(
        project_id: impl Into<String>,
        location: Location,
        language: impl Into<String>,
        vulnerability_type: VulnerabilityType,
        severity: Severity,
        detection_method: DetectionMethod,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: project_id.into(),
            location,
            language: language.into(),
            vulnerability_type,
            severity,
            description: description.into(),
            recommendation: String::new(),
            code_snippet: None,
            confidence: 0.5,
            detection_method,
            created_at: Utc::now(),
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.code_snippet = Some(snippet.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_critical_first() {
        let mut levels = vec![Severity::Info, Severity::Critical, Severity::Medium];
        levels.sort();
        assert_eq!(
            levels,
            vec![Severity::Critical, Severity::Medium, Severity::Info]
        );
    }

    #[test]
    fn confidence_is_clamped_to_unit_interval() {
        let finding = Finding::new(
            "p1",
            Location::new("src/main.c").with_line(3),
            "c",
            VulnerabilityType::BufferOverflow,
            Severity::High,
            DetectionMethod::Static,
            "out of bounds write",
        );
        assert_eq!(finding.with_confidence(1.7).confidence, 1.0);

        let finding = Finding::new(
            "p1",
            Location::new("src/main.c"),
            "c",
            VulnerabilityType::Other,
            Severity::Info,
            DetectionMethod::Semantic,
            "note",
        );
        assert_eq!(finding.with_confidence(-0.2).confidence, 0.0);
    }

    #[test]
    fn unknown_vulnerability_type_falls_back_to_other() {
        let parsed: VulnerabilityType = serde_json::from_str("\"prototype-pollution\"").unwrap();
        assert_eq!(parsed, VulnerabilityType::Other);

        let parsed: VulnerabilityType = serde_json::from_str("\"sql-injection\"").unwrap();
        assert_eq!(parsed, VulnerabilityType::SqlInjection);
    }

    #[test]
    fn dedup_key_requires_a_line_number() {
        assert!(Location::new("a.c").dedup_key().is_none());
        assert_eq!(
            Location::new("a.c").with_line(10).dedup_key(),
            Some(("a.c", 10))
        );
    }
}
