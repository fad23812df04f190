//! Error types for batch orchestration

use std::path::PathBuf;

/// Errors that fail a whole batch run
///
/// Per-file extraction failures never surface here; they land on the
/// file's outcome record instead. This enum covers only the inputs a
/// run cannot start without.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Input directory does not exist
    #[error("input directory not found: {0}")]
    InputDirMissing(PathBuf),

    /// Malformed configuration document
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO failure reading batch inputs
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Worker-pool construction failed
    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl BatchError {
    /// Create an IO error for a path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
