//! Merge engine
//!
//! Combines the result sets of every analyzer that succeeded into one
//! de-duplicated, deterministically ordered finding list plus a severity
//! summary.
//!
//! Dedup key is `(file_path, line)`. Result sets are processed in registry
//! order, which places higher-trust analyzers (static) before lower-trust
//! ones (semantic): on a key collision the earlier finding is retained.
//! Agreement at a key is a strong signal, so the retained finding is
//! promoted to `hybrid` detection, taking severity and confidence from
//! whichever source was more confident. Findings without a line number
//! have no stable anchor and are never de-duplicated.
//!
//! Output order is a pure function of the finding contents (severity, then
//! file path, then line, then insertion order) so the inherently racy
//! analyzer completion order never leaks into the report.

use std::collections::HashMap;

use ferroscan_core::domain::finding::{DetectionMethod, Finding};

use super::entities::SeveritySummary;

/// Merged findings plus their severity summary.
#[derive(Debug, Clone)]
pub struct MergedReport {
    pub findings: Vec<Finding>,
    pub summary: SeveritySummary,
}

/// Merge analyzer result sets, given in registry (trust) order.
pub fn merge_result_sets(result_sets: Vec<Vec<Finding>>) -> MergedReport {
    let mut kept: Vec<Finding> = Vec::new();
    let mut index_by_key: HashMap<(String, u32), usize> = HashMap::new();

    for result_set in result_sets {
        for finding in result_set {
            let Some(line) = finding.location.line else {
                // No stable anchor: keep independently.
                kept.push(finding);
                continue;
            };
            let key = (finding.location.file_path.clone(), line);

            match index_by_key.get(&key) {
                None => {
                    index_by_key.insert(key, kept.len());
                    kept.push(finding);
                }
                Some(&existing_idx) => {
                    let merged = promote(&kept[existing_idx], &finding);
                    kept[existing_idx] = merged;
                }
            }
        }
    }

    // Stable sort: ties keep insertion order, so equal-key rows stay in the
    // order they were first seen regardless of which analyzer finished when.
    kept.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.location.file_path.cmp(&b.location.file_path))
            .then_with(|| {
                a.location
                    .line
                    .unwrap_or(u32::MAX)
                    .cmp(&b.location.line.unwrap_or(u32::MAX))
            })
    });

    let summary = SeveritySummary::from_findings(&kept);
    MergedReport {
        findings: kept,
        summary,
    }
}

/// Cross-confirmation at the same location: keep the retained finding's
/// identity, promote detection to hybrid, and resolve severity/confidence
/// from the higher-confidence source.
fn promote(retained: &Finding, duplicate: &Finding) -> Finding {
    let mut merged = retained.clone();
    if duplicate.confidence > retained.confidence {
        merged.severity = duplicate.severity;
        merged.confidence = duplicate.confidence;
    }
    merged.detection_method = DetectionMethod::Hybrid;
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferroscan_core::domain::finding::{
        DetectionMethod, Location, Severity, VulnerabilityType,
    };

    fn finding(
        path: &str,
        line: Option<u32>,
        severity: Severity,
        confidence: f64,
        method: DetectionMethod,
    ) -> Finding {
        let mut location = Location::new(path);
        if let Some(line) = line {
            location = location.with_line(line);
        }
        Finding::new(
            "proj",
            location,
            "c",
            VulnerabilityType::BufferOverflow,
            severity,
            method,
            "desc",
        )
        .with_confidence(confidence)
    }

    #[test]
    fn agreement_at_a_key_keeps_exactly_one_promoted_finding() {
        // Static finds (a.c, 10, high); semantic confirms with critical at 0.9.
        let static_set = vec![finding(
            "a.c",
            Some(10),
            Severity::High,
            0.8,
            DetectionMethod::Static,
        )];
        let semantic_set = vec![finding(
            "a.c",
            Some(10),
            Severity::Critical,
            0.9,
            DetectionMethod::Semantic,
        )];

        let report = merge_result_sets(vec![static_set, semantic_set]);

        assert_eq!(report.findings.len(), 1);
        let merged = &report.findings[0];
        assert_eq!(merged.detection_method, DetectionMethod::Hybrid);
        assert_eq!(merged.severity, Severity::Critical);
        assert!((merged.confidence - 0.9).abs() < f64::EPSILON);
        assert_eq!(report.summary.critical, 1);
        assert_eq!(report.summary.high, 0);
    }

    #[test]
    fn earlier_source_wins_when_more_confident() {
        let static_set = vec![finding(
            "a.c",
            Some(10),
            Severity::High,
            0.95,
            DetectionMethod::Static,
        )];
        let semantic_set = vec![finding(
            "a.c",
            Some(10),
            Severity::Critical,
            0.4,
            DetectionMethod::Semantic,
        )];

        let report = merge_result_sets(vec![static_set, semantic_set]);
        let merged = &report.findings[0];
        assert_eq!(merged.detection_method, DetectionMethod::Hybrid);
        assert_eq!(merged.severity, Severity::High);
        assert!((merged.confidence - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_line_findings_are_never_deduplicated() {
        let set_a = vec![finding("a.c", None, Severity::Medium, 0.5, DetectionMethod::Static)];
        let set_b = vec![finding("a.c", None, Severity::Medium, 0.5, DetectionMethod::Semantic)];

        let report = merge_result_sets(vec![set_a, set_b]);
        assert_eq!(report.findings.len(), 2);
        assert!(
            report
                .findings
                .iter()
                .all(|f| f.detection_method != DetectionMethod::Hybrid)
        );
    }

    #[test]
    fn self_merge_is_idempotent_and_promotes_hybrid() {
        let set = vec![finding(
            "b.py",
            Some(7),
            Severity::High,
            0.7,
            DetectionMethod::Semantic,
        )];

        let report = merge_result_sets(vec![set.clone(), set]);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].detection_method, DetectionMethod::Hybrid);
        assert_eq!(report.summary.total(), 1);
    }

    #[test]
    fn output_is_ordered_by_severity_path_then_line() {
        let set = vec![
            finding("z.c", Some(1), Severity::Low, 0.5, DetectionMethod::Static),
            finding("b.c", Some(9), Severity::Critical, 0.5, DetectionMethod::Static),
            finding("a.c", Some(5), Severity::Critical, 0.5, DetectionMethod::Static),
            finding("a.c", Some(2), Severity::Critical, 0.5, DetectionMethod::Static),
            finding("a.c", None, Severity::Critical, 0.5, DetectionMethod::Static),
        ];

        let report = merge_result_sets(vec![set]);
        let order: Vec<(String, Option<u32>)> = report
            .findings
            .iter()
            .map(|f| (f.location.file_path.clone(), f.location.line))
            .collect();

        assert_eq!(
            order,
            vec![
                ("a.c".to_string(), Some(2)),
                ("a.c".to_string(), Some(5)),
                ("a.c".to_string(), None),
                ("b.c".to_string(), Some(9)),
                ("z.c".to_string(), Some(1)),
            ]
        );
    }

    #[test]
    fn order_is_independent_of_result_set_arrival() {
        let static_set = vec![
            finding("m.c", Some(3), Severity::High, 0.8, DetectionMethod::Static),
            finding("n.c", Some(8), Severity::Low, 0.8, DetectionMethod::Static),
        ];
        let semantic_set = vec![
            finding("k.c", Some(1), Severity::High, 0.6, DetectionMethod::Semantic),
        ];

        let forward = merge_result_sets(vec![static_set.clone(), semantic_set.clone()]);
        let reversed = merge_result_sets(vec![semantic_set, static_set]);

        let keys = |report: &MergedReport| -> Vec<(String, Option<u32>, Severity)> {
            report
                .findings
                .iter()
                .map(|f| (f.location.file_path.clone(), f.location.line, f.severity))
                .collect()
        };
        assert_eq!(keys(&forward), keys(&reversed));
    }

    #[test]
    fn empty_input_yields_empty_report_with_zero_summary() {
        let report = merge_result_sets(vec![]);
        assert!(report.findings.is_empty());
        assert_eq!(report.summary, SeveritySummary::default());
    }

    #[test]
    fn summary_counts_sum_to_findings_length() {
        let set = vec![
            finding("a.c", Some(1), Severity::Critical, 0.5, DetectionMethod::Static),
            finding("a.c", Some(2), Severity::Info, 0.5, DetectionMethod::Static),
            finding("b.c", Some(1), Severity::Info, 0.5, DetectionMethod::Semantic),
        ];
        let report = merge_result_sets(vec![set]);
        assert_eq!(report.summary.total(), report.findings.len());
    }
}
