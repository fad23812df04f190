//! Batch processing of block-diagram models and code-gen archives

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracelink_graph::GraphDocument;
use tracelink_simulink::{
    analyze_codegen_archive, CodeMappingDocument, SimulinkError, SimulinkModel, ROOT_DESCRIPTOR,
};
use tracelink_version::{track_file, ArtifactType, Tool, TrackOutcome};
use walkdir::WalkDir;

use crate::config::SimulinkConfig;
use crate::error::BatchError;
use crate::summary::BatchSummary;

/// File name of a per-model version store
const VERSION_STORE_NAME: &str = "simulink_versions.json";
/// File name of a per-model connectivity export
const CONNECTIVITY_NAME: &str = "block_connectivity.json";

/// One model's extraction result
#[derive(Debug)]
pub struct SimulinkModelResult {
    /// Model name derived from the directory layout
    pub model_name: String,
    /// Directory the model was loaded from
    pub model_dir: PathBuf,
    /// Canonical graph of blocks and signal edges
    pub graph: GraphDocument,
    /// Lines/branches skipped for unparseable endpoints
    pub skipped_endpoints: usize,
    /// Version tracking outcome, when enabled
    pub track: Option<TrackOutcome>,
}

/// Everything one block-diagram batch run produced
#[derive(Debug)]
pub struct SimulinkBatchResult {
    /// Aggregate summary over models and code-gen archives
    pub summary: BatchSummary,
    /// Per-model results, in discovery order
    pub models: Vec<SimulinkModelResult>,
    /// Code-mapping documents per `.slxc` archive
    pub code_mappings: Vec<CodeMappingDocument>,
}

/// Processor for a tree of model directories and `.slxc` archives
#[derive(Debug)]
pub struct SimulinkBatch {
    config: SimulinkConfig,
    workers: Option<usize>,
}

impl SimulinkBatch {
    /// Create a processor with the given settings
    #[must_use]
    pub fn new(config: SimulinkConfig) -> Self {
        Self {
            config,
            workers: None,
        }
    }

    /// Cap the per-model worker fan-out
    #[must_use]
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Process every model tree and code-gen archive under the root
    ///
    /// Models are independent and extract in parallel; exports and
    /// version tracking follow sequentially. A single model's failure
    /// is recorded and the batch continues.
    ///
    /// # Errors
    /// Returns [`BatchError`] only when the models directory is missing
    /// or the worker pool cannot be built.
    pub fn run(&self) -> Result<SimulinkBatchResult, BatchError> {
        let root = &self.config.models_dir;
        if !root.is_dir() {
            return Err(BatchError::InputDirMissing(root.clone()));
        }

        let model_dirs = discover_model_dirs(root);
        let archives = discover_archives(root, "slxc");
        tracing::info!(
            models = model_dirs.len(),
            archives = archives.len(),
            "processing block-diagram inputs"
        );

        let loaded = match self.workers {
            Some(workers) => rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()?
                .install(|| load_all(&model_dirs)),
            None => load_all(&model_dirs),
        };

        let mut summary = BatchSummary {
            total_files: model_dirs.len() + archives.len(),
            ..Default::default()
        };
        let mut models = Vec::new();

        for (dir, outcome) in loaded {
            match outcome {
                Ok(model) => {
                    summary.record_success(&model.model_name, model.blocks.len(), model.skipped_endpoints);
                    let graph = model.to_graph();
                    let model_root = model_root(&dir);

                    let connectivity_path = model_root.join(CONNECTIVITY_NAME);
                    if let Err(e) = graph.write_to(&connectivity_path) {
                        summary
                            .export_errors
                            .push(format!("{}: {e}", connectivity_path.display()));
                    }

                    let track = if self.config.track_versions {
                        let store_path = model_root.join(VERSION_STORE_NAME);
                        match track_file(&graph, ArtifactType::Model, Tool::Simulink, &store_path) {
                            Ok(outcome) => Some(outcome),
                            Err(e) => {
                                summary
                                    .export_errors
                                    .push(format!("{}: {e}", store_path.display()));
                                None
                            }
                        }
                    } else {
                        None
                    };

                    models.push(SimulinkModelResult {
                        model_name: model.model_name,
                        model_dir: dir,
                        graph,
                        skipped_endpoints: model.skipped_endpoints,
                        track,
                    });
                }
                Err(error) => summary.record_failure(dir.display().to_string(), error.to_string()),
            }
        }

        let mut code_mappings = Vec::new();
        for archive in &archives {
            let archive_name = archive
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| archive.display().to_string());
            match analyze_codegen_archive(archive) {
                Ok(doc) => {
                    summary.record_success(&archive_name, doc.mappings.len(), 0);
                    let stem = archive
                        .file_stem()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| archive_name.clone());
                    let out_path = archive
                        .parent()
                        .unwrap_or_else(|| Path::new("."))
                        .join(format!("{stem}_code_mappings.json"));
                    match doc.to_json() {
                        Ok(json) => {
                            if let Err(e) = std::fs::write(&out_path, json) {
                                summary
                                    .export_errors
                                    .push(format!("{}: {e}", out_path.display()));
                            }
                        }
                        Err(e) => summary
                            .export_errors
                            .push(format!("{}: {e}", out_path.display())),
                    }
                    code_mappings.push(doc);
                }
                Err(error) => summary.record_failure(&archive_name, error.to_string()),
            }
        }

        tracing::info!(
            successful = summary.successful,
            failed = summary.failed,
            "block-diagram batch complete"
        );
        Ok(SimulinkBatchResult {
            summary,
            models,
            code_mappings,
        })
    }
}

fn load_all(dirs: &[PathBuf]) -> Vec<(PathBuf, Result<SimulinkModel, SimulinkError>)> {
    dirs.par_iter()
        .map(|dir| (dir.clone(), SimulinkModel::load(dir)))
        .collect()
}

/// Model directories are wherever a root descriptor lives
fn discover_model_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file() && entry.file_name().to_str() == Some(ROOT_DESCRIPTOR)
        })
        .filter_map(|entry| entry.path().parent().map(Path::to_path_buf))
        .collect();
    dirs.sort();
    dirs.dedup();
    dirs
}

fn discover_archives(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut archives: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();
    archives.sort();
    archives
}

/// Stores and exports live at the model's top directory, one level up
/// from a conventional `simulink/` payload directory
fn model_root(dir: &Path) -> PathBuf {
    match dir.file_name().and_then(|n| n.to_str()) {
        Some(name) if name.eq_ignore_ascii_case("simulink") => {
            dir.parent().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf())
        }
        _ => dir.to_path_buf(),
    }
}
