//! Per-file outcomes and the aggregate batch summary

use serde::Serialize;
use tracelink_graph::Collision;

/// Terminal state of one processed input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    /// Extraction succeeded
    Success {
        /// Entities extracted (requirements or blocks)
        entities: usize,
        /// References dropped as unresolvable or unparseable
        dropped_references: usize,
    },
    /// Extraction failed; the batch continued without this input
    Failed {
        /// Failure reason
        error: String,
    },
}

/// One input's outcome record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Input file or model name
    pub filename: String,
    /// Terminal state
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Aggregate summary of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Inputs discovered
    pub total_files: usize,
    /// Inputs that extracted successfully
    pub successful: usize,
    /// Inputs that failed
    pub failed: usize,
    /// Entities extracted across all successful inputs
    pub total_entities: usize,
    /// Per-input outcomes, in input order
    pub files: Vec<FileRecord>,
    /// Same-id overwrites recorded during the merge
    pub collisions: Vec<Collision>,
    /// Export steps that failed after extraction succeeded
    pub export_errors: Vec<String>,
}

impl BatchSummary {
    /// Record a successful input
    pub fn record_success(
        &mut self,
        filename: impl Into<String>,
        entities: usize,
        dropped_references: usize,
    ) {
        self.successful += 1;
        self.total_entities += entities;
        self.files.push(FileRecord {
            filename: filename.into(),
            status: FileStatus::Success {
                entities,
                dropped_references,
            },
        });
    }

    /// Record a failed input
    pub fn record_failure(&mut self, filename: impl Into<String>, error: impl Into<String>) {
        let filename = filename.into();
        let error = error.into();
        tracing::warn!(file = %filename, error = %error, "input failed, batch continuing");
        self.failed += 1;
        self.files.push(FileRecord {
            filename,
            status: FileStatus::Failed { error },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_outcomes() {
        let mut summary = BatchSummary {
            total_files: 2,
            ..Default::default()
        };
        summary.record_success("a.mdzip", 5, 1);
        summary.record_failure("b.mdzip", "entry missing");

        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_entities, 5);
        assert_eq!(summary.files.len(), 2);
    }

    #[test]
    fn serialized_records_are_tagged() {
        let mut summary = BatchSummary::default();
        summary.record_failure("b.mdzip", "entry missing");

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"error\":\"entry missing\""));
    }
}
