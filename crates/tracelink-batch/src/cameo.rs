//! Batch processing of requirements archives

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracelink_cameo::{CameoError, CameoModel};
use tracelink_graph::{infer_hierarchy, validate, GraphDocument, QualityReport};
use tracelink_version::{track_file, ArtifactType, Tool, TrackOutcome};

use crate::config::CameoConfig;
use crate::error::BatchError;
use crate::summary::BatchSummary;

/// Everything one requirements batch run produced
///
/// The in-memory results are authoritative; export failures are listed
/// on the summary, never propagated.
#[derive(Debug)]
pub struct CameoBatchResult {
    /// Aggregate summary with per-file outcomes
    pub summary: BatchSummary,
    /// All files merged into one canonical graph
    pub merged: GraphDocument,
    /// Quality report over the merged graph
    pub report: QualityReport,
    /// Hierarchy links added by inference
    pub hierarchy_links: usize,
    /// Version tracking outcome, when enabled
    pub track: Option<TrackOutcome>,
}

/// Processor for a directory of `.mdzip` archives
#[derive(Debug)]
pub struct CameoBatch {
    config: CameoConfig,
    workers: Option<usize>,
}

impl CameoBatch {
    /// Create a processor with the given settings
    #[must_use]
    pub fn new(config: CameoConfig) -> Self {
        Self {
            config,
            workers: None,
        }
    }

    /// Cap the per-archive worker fan-out
    #[must_use]
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Process every archive under the input directory
    ///
    /// Archives extract in parallel (they share no mutable state);
    /// merging, hierarchy inference, validation and version tracking
    /// run sequentially over the combined result. A single archive's
    /// failure lands on its outcome record and the batch continues.
    ///
    /// # Errors
    /// Returns [`BatchError`] only when the input directory is missing
    /// or the worker pool cannot be built.
    pub fn run(&self) -> Result<CameoBatchResult, BatchError> {
        let archives = self.discover_archives()?;
        tracing::info!(count = archives.len(), "processing requirements archives");

        let parsed = match self.workers {
            Some(workers) => rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()?
                .install(|| parse_all(&archives)),
            None => parse_all(&archives),
        };

        let mut summary = BatchSummary {
            total_files: archives.len(),
            ..Default::default()
        };
        let mut merged = GraphDocument::new();

        for (path, outcome) in parsed {
            let filename = file_name(&path);
            match outcome {
                Ok(model) => {
                    summary.record_success(
                        &filename,
                        model.stats.requirements,
                        model.stats.resolution_misses,
                    );
                    let mut doc = model.to_graph();
                    // Batch merges key provenance by archive stem
                    let stem = file_stem(&path);
                    for node in doc.nodes.values_mut() {
                        node.source_file = stem.clone();
                    }
                    self.export_per_file(&stem, &doc, &mut summary);
                    summary.collisions.extend(merged.merge(doc));
                }
                Err(error) => summary.record_failure(&filename, error.to_string()),
            }
        }

        let hierarchy_links = if self.config.infer_hierarchy {
            infer_hierarchy(&mut merged)
        } else {
            0
        };
        let report = validate(&merged);

        let track = if self.config.track_versions {
            match track_file(
                &merged,
                ArtifactType::Requirement,
                Tool::Cameo,
                &self.config.version_store,
            ) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    summary
                        .export_errors
                        .push(format!("version store: {e}"));
                    None
                }
            }
        } else {
            None
        };

        self.export_combined(&merged, &report, &mut summary);

        tracing::info!(
            successful = summary.successful,
            failed = summary.failed,
            requirements = summary.total_entities,
            collisions = summary.collisions.len(),
            "requirements batch complete"
        );
        Ok(CameoBatchResult {
            summary,
            merged,
            report,
            hierarchy_links,
            track,
        })
    }

    fn discover_archives(&self) -> Result<Vec<PathBuf>, BatchError> {
        let dir = &self.config.input_dir;
        if !dir.is_dir() {
            return Err(BatchError::InputDirMissing(dir.clone()));
        }
        let entries = std::fs::read_dir(dir).map_err(|e| BatchError::io_error(dir, e))?;
        let mut archives: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("mdzip"))
            .collect();
        archives.sort();
        Ok(archives)
    }

    fn export_per_file(&self, stem: &str, doc: &GraphDocument, summary: &mut BatchSummary) {
        let path = self.config.output_dir.join(format!("{stem}_connectivity.json"));
        if let Err(e) = doc.write_to(&path) {
            summary.export_errors.push(format!("{}: {e}", path.display()));
        }
    }

    fn export_combined(
        &self,
        merged: &GraphDocument,
        report: &QualityReport,
        summary: &mut BatchSummary,
    ) {
        let merged_path = self.config.output_dir.join("all_requirements.json");
        if let Err(e) = merged.write_to(&merged_path) {
            summary
                .export_errors
                .push(format!("{}: {e}", merged_path.display()));
        }

        let report_path = self.config.output_dir.join("quality_report.json");
        write_json(&report_path, report, &mut summary.export_errors);

        let summary_path = self.config.output_dir.join("batch_summary.json");
        // The summary serializes after all other outcomes are recorded;
        // its own write failure can only be logged
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&summary_path, json) {
                    tracing::warn!(path = %summary_path.display(), error = %e, "summary export failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "summary serialization failed"),
        }
    }
}

fn parse_all(archives: &[PathBuf]) -> Vec<(PathBuf, Result<CameoModel, CameoError>)> {
    archives
        .par_iter()
        .map(|path| (path.clone(), CameoModel::parse_archive(path)))
        .collect()
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T, export_errors: &mut Vec<String>) {
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            export_errors.push(format!("{}: {e}", path.display()));
            return;
        }
    };
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            export_errors.push(format!("{}: {e}", parent.display()));
            return;
        }
    }
    if let Err(e) = std::fs::write(path, json) {
        export_errors.push(format!("{}: {e}", path.display()));
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
