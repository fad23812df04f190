//! Error types for document IO

use std::path::PathBuf;

/// Errors reading or writing a graph document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Serialization or deserialization failure
    #[error("document serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO failure on a document file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Create an IO error for a path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
