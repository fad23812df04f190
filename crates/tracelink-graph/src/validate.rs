//! Quality validation over a canonical graph document
//!
//! Findings never block export; the report travels next to the graph so
//! reviewers see what the model itself failed to say.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::GraphDocument;
use crate::PLACEHOLDER_TEXT;

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural defect (e.g. missing name)
    Error,
    /// Quality gap worth surfacing (e.g. missing text)
    Warning,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Node id the finding applies to
    pub artifact_id: String,
    /// Finding severity
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
}

/// Aggregate counts over a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityStats {
    /// Total nodes examined
    pub total: usize,
    /// Nodes carrying real (non-placeholder) text
    pub with_text: usize,
    /// Nodes with at least one edge
    pub with_relationships: usize,
    /// Node counts by node type
    pub by_type: BTreeMap<String, usize>,
    /// Node counts by source file
    pub by_source: BTreeMap<String, usize>,
}

/// Validation output: statistics plus the issue list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Aggregate statistics
    pub statistics: QualityStats,
    /// Individual findings, in document order
    pub issues: Vec<ValidationIssue>,
}

impl QualityReport {
    /// Findings of a given severity
    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}

/// Validate a document, producing statistics and findings
#[must_use]
pub fn validate(doc: &GraphDocument) -> QualityReport {
    let mut report = QualityReport::default();
    report.statistics.total = doc.len();

    for (id, node) in &doc.nodes {
        *report
            .statistics
            .by_type
            .entry(node.node_type.clone())
            .or_default() += 1;
        *report
            .statistics
            .by_source
            .entry(node.source_file.clone())
            .or_default() += 1;

        if node.is_connected() {
            report.statistics.with_relationships += 1;
        } else {
            report.issues.push(ValidationIssue {
                artifact_id: id.clone(),
                severity: Severity::Warning,
                message: "orphaned node with no relationships".to_string(),
            });
        }

        if node.name.trim().is_empty() {
            report.issues.push(ValidationIssue {
                artifact_id: id.clone(),
                severity: Severity::Error,
                message: "missing node name".to_string(),
            });
        }

        // Text is a requirement-side field; blocks never carry it
        if node.node_type.starts_with("Requirement") {
            match node.text.as_deref() {
                Some(text) if !text.is_empty() && text != PLACEHOLDER_TEXT => {
                    report.statistics.with_text += 1;
                }
                _ => {
                    report.issues.push(ValidationIssue {
                        artifact_id: id.clone(),
                        severity: Severity::Warning,
                        message: "missing requirement text".to_string(),
                    });
                }
            }
        }
    }

    tracing::debug!(
        total = report.statistics.total,
        issues = report.issues.len(),
        "validation complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CanonicalNode;

    fn requirement(name: &str, text: Option<&str>) -> CanonicalNode {
        let mut node = CanonicalNode::new(name, "Requirement_General", "reqs.mdzip");
        node.text = text.map(str::to_string);
        node
    }

    #[test]
    fn counts_real_text_only() {
        let mut doc = GraphDocument::new();
        doc.insert("R1", requirement("one", Some("The system shall...")));
        doc.insert("R2", requirement("two", Some(PLACEHOLDER_TEXT)));
        doc.insert("R3", requirement("three", None));

        let report = validate(&doc);
        assert_eq!(report.statistics.with_text, 1);
        let warnings: Vec<_> = report
            .issues_with(Severity::Warning)
            .filter(|i| i.message.contains("text"))
            .collect();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn missing_name_is_an_error() {
        let mut doc = GraphDocument::new();
        doc.insert("R1", requirement("  ", Some("text")));

        let report = validate(&doc);
        assert_eq!(report.issues_with(Severity::Error).count(), 1);
    }

    #[test]
    fn connected_nodes_are_not_orphans() {
        let mut doc = GraphDocument::new();
        let mut linked = requirement("one", Some("text"));
        linked.add_outgoing("R2");
        doc.insert("R1", linked);
        doc.insert("R2", requirement("two", Some("text")));

        let report = validate(&doc);
        assert_eq!(report.statistics.with_relationships, 1);
        let orphan_warnings: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.message.contains("orphaned"))
            .collect();
        assert_eq!(orphan_warnings.len(), 1);
        assert_eq!(orphan_warnings[0].artifact_id, "R2");
    }

    #[test]
    fn blocks_do_not_warn_about_text() {
        let mut doc = GraphDocument::new();
        let mut block = CanonicalNode::new("Gain", "Gain", "model");
        block.add_incoming("1");
        doc.insert("5", block);

        let report = validate(&doc);
        assert!(report.issues.is_empty());
        assert_eq!(report.statistics.with_text, 0);
    }

    #[test]
    fn stats_group_by_type_and_source() {
        let mut doc = GraphDocument::new();
        doc.insert("R1", requirement("one", Some("t")));
        doc.insert("R2", requirement("two", Some("t")));

        let report = validate(&doc);
        assert_eq!(report.statistics.by_type["Requirement_General"], 2);
        assert_eq!(report.statistics.by_source["reqs.mdzip"], 2);
    }
}
